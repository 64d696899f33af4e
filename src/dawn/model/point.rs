use serde::Deserialize;

/// 积分查询响应体
#[derive(Debug, Deserialize)]
pub struct PointResponse {
    #[serde(default)]
    pub points: Option<serde_json::Number>,
}

impl PointResponse {
    /// 缺省为 0
    pub fn points(self) -> serde_json::Number {
        self.points.unwrap_or_else(|| 0.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_integer_and_float() {
        let r: PointResponse = serde_json::from_str(r#"{"points": 1520}"#).unwrap();
        assert_eq!(r.points().to_string(), "1520");

        let r: PointResponse = serde_json::from_str(r#"{"points": 12.5}"#).unwrap();
        assert_eq!(r.points().to_string(), "12.5");
    }

    #[test]
    fn test_points_default_zero() {
        let r: PointResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.points().to_string(), "0");
    }
}

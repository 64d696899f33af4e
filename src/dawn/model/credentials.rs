//! 账号凭证数据模型
//!
//! 由登录工具写入的 `tokens.json`：`[{ "email", "userId", "sessionToken" }, ...]`

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

/// 单个账号的凭证记录
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DawnCredentials {
    /// 账号标识（邮箱）
    #[serde(default)]
    pub email: Option<String>,

    /// Dawn 用户 ID，服务端可能写成数字
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,

    /// Bearer session token
    #[serde(default)]
    pub session_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    }))
}

impl DawnCredentials {
    /// 获取默认凭证文件路径
    pub fn default_credentials_path() -> &'static str {
        "tokens.json"
    }

    /// 三个字段都存在且非空
    pub fn is_complete(&self) -> bool {
        [&self.email, &self.user_id, &self.session_token]
            .iter()
            .all(|f| f.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// 从 JSON 字符串解析凭证列表
    ///
    /// 顶层不是数组时返回空列表；无法解析的单条记录直接跳过
    pub fn parse_list(json_string: &str) -> Vec<Self> {
        let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(json_string) else {
            tracing::warn!("凭证文件不是 JSON 数组，忽略");
            return Vec::new();
        };

        values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }

    /// 从文件加载凭证列表，文件不存在时返回空列表
    pub fn load_all<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("凭证文件 {:?} 不存在", path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        Ok(Self::parse_list(&content))
    }
}

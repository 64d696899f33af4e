//! 账号聚合与账号表

use std::collections::HashMap;
use std::sync::Arc;

use crate::dawn::model::credentials::DawnCredentials;
use crate::dawn::session::AccountSession;
use crate::dawn::user_agent::random_user_agent;
use crate::pool::status::{AccountStatus, StatusHandle};

/// 账号信息，加载后不可变；状态通过内部句柄更新
#[derive(Debug)]
pub struct Account {
    /// 唯一标识（邮箱）
    pub id: String,
    /// 会话配置
    pub session: AccountSession,
    /// 状态
    pub status: StatusHandle,
}

impl Account {
    pub fn new(id: impl Into<String>, session: AccountSession) -> Self {
        Self {
            id: id.into(),
            session,
            status: StatusHandle::new(),
        }
    }

    /// 从凭证创建，字段不完整时返回 `None`
    pub fn from_credentials(credentials: DawnCredentials) -> Option<Self> {
        if !credentials.is_complete() {
            return None;
        }
        let DawnCredentials {
            email: Some(email),
            user_id: Some(user_id),
            session_token: Some(session_token),
        } = credentials
        else {
            return None;
        };

        let session = AccountSession::new(user_id, session_token, random_user_agent());
        Some(Self::new(email, session))
    }

    /// 脱敏后的标识，用于日志与展示
    pub fn masked_id(&self) -> String {
        mask_account(&self.id)
    }
}

/// 账号脱敏：保留前 3 与后 3 个字符，邮箱保留域名
pub fn mask_account(account: &str) -> String {
    match account.split_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_part(local), domain),
        None => mask_part(account),
    }
}

fn mask_part(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let head: String = chars.iter().take(3).collect();
    let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
    format!("{}***{}", head, tail)
}

/// 账号表
///
/// 按加载顺序保存，按标识索引；加载后不再增删
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Arc<Account>>,
    index: HashMap<String, usize>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册账号，标识重复时忽略并返回 false
    pub fn insert(&mut self, account: Account) -> bool {
        if self.index.contains_key(&account.id) {
            return false;
        }
        self.index.insert(account.id.clone(), self.accounts.len());
        self.accounts.push(Arc::new(account));
        true
    }

    /// 从凭证列表构建，字段不完整的记录静默跳过
    pub fn from_credentials(credentials: Vec<DawnCredentials>) -> Self {
        let mut registry = Self::new();
        for creds in credentials {
            let Some(account) = Account::from_credentials(creds) else {
                tracing::debug!("跳过字段不完整的凭证记录");
                continue;
            };
            let masked = account.masked_id();
            if !registry.insert(account) {
                tracing::warn!("账号 {} 重复，忽略后出现的记录", masked);
            }
        }
        registry
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: &str) -> Option<&Arc<Account>> {
        self.index.get(id).map(|&i| &self.accounts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Account>> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// 按加载顺序读取所有账号状态
    pub fn snapshot(&self) -> Vec<(String, AccountStatus)> {
        self.accounts
            .iter()
            .map(|a| (a.id.clone(), a.status.snapshot()))
            .collect()
    }
}

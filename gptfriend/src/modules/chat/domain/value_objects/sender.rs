use serde::{Deserialize, Serialize};

/// 消息发送方
///
/// 创建后不可变；持久化时映射为 `is_user` 布尔列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// 用户
    User,
    /// AI 助手
    Assistant,
}

impl Sender {
    /// 从 `is_user` 列恢复
    pub fn from_is_user(is_user: bool) -> Self {
        if is_user {
            Sender::User
        } else {
            Sender::Assistant
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Sender::User)
    }

    /// 转换为 OpenAI 格式的角色名
    pub fn to_openai_role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    /// 文本转录时使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Assistant => "Assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_user_round_trip() {
        assert_eq!(Sender::from_is_user(true), Sender::User);
        assert_eq!(Sender::from_is_user(false), Sender::Assistant);
        assert!(Sender::User.is_user());
        assert!(!Sender::Assistant.is_user());
    }

    #[test]
    fn test_openai_roles() {
        assert_eq!(Sender::User.to_openai_role(), "user");
        assert_eq!(Sender::Assistant.to_openai_role(), "assistant");
    }
}

// 合成到对话中的助手提示文本

use crate::modules::chat::ports::{CompletionError, InitError};

/// 会话未就绪时的固定回复
pub const NOT_INITIALIZED_NOTICE: &str =
    "OpenAI client is not initialized. Please check previous error messages and restart the app.";

/// 凭据缺失时的提示
pub const MISSING_CREDENTIAL_NOTICE: &str =
    "API key not configured. Please set OPENAI_API_KEY (environment or config.json) and restart.";

/// 初始化失败提示（区分凭据缺失和底层故障）
pub fn init_failure_notice(err: &InitError) -> String {
    match err {
        InitError::MissingCredential => MISSING_CREDENTIAL_NOTICE.to_string(),
        InitError::ConnectionFault(detail) => {
            format!("FATAL on init: {}. Check the logs for details.", detail)
        }
    }
}

/// 补全失败提示
pub fn completion_failure_notice(err: &CompletionError) -> String {
    format!("Error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::ConversationWindow;

    #[test]
    fn test_init_notices_are_config_errors() {
        let missing = init_failure_notice(&InitError::MissingCredential);
        let fault = init_failure_notice(&InitError::ConnectionFault("tls".to_string()));

        assert!(ConversationWindow::is_config_error(&missing));
        assert!(ConversationWindow::is_config_error(&fault));
        assert_ne!(missing, fault);
        assert_eq!(fault, "FATAL on init: tls. Check the logs for details.");
    }

    #[test]
    fn test_completion_notice() {
        let err = CompletionError::TransportOrApiError("boom".to_string());
        assert_eq!(completion_failure_notice(&err), "Error: boom");
        assert_eq!(
            completion_failure_notice(&CompletionError::EmptyResponse),
            "Error: No response from ChatGPT"
        );
    }

    #[test]
    fn test_not_initialized_notice_is_replayable() {
        assert!(!ConversationWindow::is_config_error(NOT_INITIALIZED_NOTICE));
    }
}

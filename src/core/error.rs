// Custom error types for the record pipeline
// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("入力ファイルエラー: {path} - {source}")]
    InputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("レポート出力エラー: {path} - {source}")]
    ReportError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("チャンネルエラー: {stage} - {message}")]
    ChannelError { stage: String, message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("プロトコル違反: 終了シグナル {expected} 件を期待しましたが {received} 件で入力が閉じられました")]
    ProtocolViolation { expected: usize, received: usize },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// 入力ファイルエラーの作成
    pub fn input(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputError {
            path: path.into(),
            source,
        }
    }

    /// レポート出力エラーの作成
    pub fn report(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReportError {
            path: path.into(),
            source,
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// チャンネルエラーの作成
    pub fn channel(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// 終了シグナル不足の作成
    pub fn protocol_violation(expected: usize, received: usize) -> Self {
        Self::ProtocolViolation { expected, received }
    }

    /// 内部エラーの作成
    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InputError { .. } | Self::ReportError { .. } => ErrorSeverity::High,
            Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::ChannelError { .. } | Self::TaskError { .. } => ErrorSeverity::Medium,
            Self::ProtocolViolation { .. } | Self::InternalError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// パイプラインはリトライを行わないため、ここでの「回復可能」は
    /// 入力や設定を直して再実行すれば解消する見込みがあることを示す
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InputError { .. } | Self::ReportError { .. } => true,
            Self::ConfigurationError { .. } => true,
            Self::ChannelError { .. } | Self::TaskError { .. } => false,
            Self::ProtocolViolation { .. } | Self::InternalError { .. } => false,
        }
    }

    /// エラーコンテキストを取得
    pub fn context(&self) -> ErrorContext {
        match self {
            Self::InputError { path, .. } => ErrorContext::new("read_input")
                .with_resource(path.clone())
                .with_suggestion("入力ファイルのパスと読み取り権限を確認してください"),
            Self::ReportError { path, .. } => ErrorContext::new("write_report")
                .with_resource(path.clone())
                .with_suggestion("出力先ディレクトリの書き込み権限を確認してください"),
            Self::ConfigurationError { message } => ErrorContext::new("configuration")
                .with_suggestion(format!("設定を確認してください: {message}")),
            Self::ChannelError { stage, .. } => {
                ErrorContext::new("channel").with_resource(stage.clone())
            }
            Self::ProtocolViolation { .. } => ErrorContext::new("merge_termination")
                .with_suggestion("全ワーカーが終了シグナルを送信しているか確認してください"),
            _ => ErrorContext::new("unknown"),
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - システム停止レベル
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// エラーコンテキスト情報
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// 実行していた操作
    pub operation: String,
    /// 関連するリソース（ファイルパス、ステージ名等）
    pub resource: Option<String>,
    /// エラー解決のための提案
    pub suggestion: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            suggestion: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// 入力行の解析エラー
///
/// 致命的ではなく、該当行をスキップして処理を継続する
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineParseError {
    #[error("フィールド数が不正です (期待値: 3, 実際: {found})")]
    FieldCount { found: usize },

    #[error("IDを解析できません: {value:?}")]
    InvalidId { value: String },

    #[error("金額を解析できません: {value:?}")]
    InvalidAmount { value: String },

    #[error("UTF-8として解釈できません ({valid_up_to} バイト目以降)")]
    InvalidEncoding { valid_up_to: usize },
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        PipelineError::InternalError { source: error }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::TaskError { source: error }
    }
}

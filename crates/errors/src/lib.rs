use thiserror::Error;

/// 同步过程中的错误类型定义
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("数据库连接失败: {0}")]
    Connection(String),
    #[error("语句执行失败 ({statement}): {message}")]
    Statement { statement: String, message: String },
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("缺少依赖实体: {0}")]
    MissingDependency(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    pub fn statement<S: Into<String>, M: ToString>(statement: S, message: M) -> Self {
        Self::Statement {
            statement: statement.into(),
            message: message.to_string(),
        }
    }
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn missing_dependency<S: Into<String>>(msg: S) -> Self {
        Self::MissingDependency(msg.into())
    }

    /// 致命错误会中止整个运行，其余错误只影响当前处理单元
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Connection(_) | SyncError::Configuration(_)
        )
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::Internal(err.to_string())
    }
}

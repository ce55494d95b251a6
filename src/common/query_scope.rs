// src/common/query_scope.rs

use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::common::error::AppError;

/// Escopo de uma operação do dashboard: token de cancelamento + prazo opcional.
///
/// Toda chamada ao ledger passa por `run`, então um cancelamento ou um prazo
/// estourado interrompe a operação inteira na próxima consulta.
#[derive(Debug, Clone)]
pub struct QueryScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryScope {
    pub fn new(token: CancellationToken, deadline: Option<Instant>) -> Self {
        Self { token, deadline }
    }

    /// Escopo sem prazo, ligado a um token novo.
    #[cfg(test)]
    pub fn unbounded() -> Self {
        Self::new(CancellationToken::new(), None)
    }

    /// Escopo filho de `parent` que expira depois de `timeout`.
    pub fn with_timeout(parent: &CancellationToken, timeout: Duration) -> Self {
        Self::new(parent.child_token(), Some(Instant::now() + timeout))
    }

    #[cfg(test)]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub async fn run<T, F>(&self, query: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        if self.token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(AppError::Cancelled),
                    _ = tokio::time::sleep_until(deadline) => Err(AppError::DeadlineExceeded),
                    result = query => result,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(AppError::Cancelled),
                    result = query => result,
                }
            }
        }
    }
}

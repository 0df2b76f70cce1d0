//! Tipos de erro para o cliente da API de estatísticas.
//!
//! Define [`ApiError`] com variantes para falha de rede, status HTTP de erro
//! e corpo de resposta fora do esquema esperado. Usa `thiserror` para derivar
//! `Display` e `Error` automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao consultar a API de estatísticas.
///
/// As variantes cobrem os três cenários de falha do coletor:
/// - [`Network`](ApiError::Network) — falha na camada de rede
/// - [`Status`](ApiError::Status) — o servidor retornou um status de erro (4xx/5xx)
/// - [`Schema`](ApiError::Schema) — o corpo não corresponde ao esquema esperado
#[derive(Debug, Error)]
pub enum ApiError {
    /// Falha na camada de transporte (DNS, conexão recusada, timeout),
    /// convertida do erro original do `reqwest`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// O servidor respondeu com um status de erro. Contém a URL consultada,
    /// o código de status e o corpo da resposta de erro.
    #[error("API error (status {status}) for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// O corpo da resposta não pôde ser decodificado: campo ausente ou
    /// inesperado, ou valor não numérico onde se esperava um número.
    #[error("unexpected response shape from {url}: {source}")]
    Schema {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

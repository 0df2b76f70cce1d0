//! Tipos de dados para as respostas da API de estatísticas.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON.
//! As respostas reais carregam dezenas de campos; a desserialização ignora
//! os desconhecidos e mapeia apenas o que o pipeline consome.

use serde::{Deserialize, Serialize};

use crate::flow::EntityId;

/// Resposta do recurso de listagem: o conjunto de entidades rastreadas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    /// Entidades listadas pela API (jogadores, na fonte padrão).
    pub elements: Vec<RosterEntry>,
}

/// Uma entidade listada. Só o identificador interessa ao coletor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Identificador usado para montar a URL do recurso de detalhe.
    pub id: EntityId,
}

/// Resposta do recurso de detalhe: o histórico de pontuação de uma entidade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Observações na ordem em que a API as retorna.
    pub history: Vec<RoundScore>,
}

/// Uma observação (rodada, pontuação) no histórico de uma entidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    /// Rodada em que a pontuação foi registrada.
    pub round: u32,
    /// Pontuação total da entidade na rodada (pode ser negativa).
    pub total_points: i32,
}

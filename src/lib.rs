//! scoreflow coleta históricos de pontuação por rodada de uma API pública,
//! agrega as transições entre rodadas adjacentes em uma tabela de arestas
//! ponderadas e gera um relatório HTML com o diagrama de fluxo.

pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod flow;
pub mod pipeline;
pub mod report;
pub mod ui;

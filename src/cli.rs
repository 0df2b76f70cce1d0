//! Interface de linha de comando do scoreflow baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (build, edges, demo)
//! e flags globais (--limit, --skip-failed, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// scoreflow — Coleta históricos de pontuação e gera relatórios de fluxo.
#[derive(Debug, Parser)]
#[command(name = "scoreflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Limita a coleta às N primeiras entidades do elenco.
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Pula entidades cujo detalhe falhou em vez de abortar a execução.
    #[arg(long, global = true, default_value_t = false)]
    pub skip_failed: bool,

    /// Imprime o resumo completo da execução ao final.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Formato de saída para a tabela de arestas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeFormat {
    /// Valores separados por vírgula.
    Csv,
    /// Valores separados por tabulação.
    Tsv,
}

impl EdgeFormat {
    /// Caractere separador correspondente ao formato.
    pub fn separator(self) -> char {
        match self {
            EdgeFormat::Csv => ',',
            EdgeFormat::Tsv => '\t',
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Coleta os dados e gera o relatório HTML completo.
    Build {
        /// Caminho de saída do relatório (sobrepõe o arquivo de configuração).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Emite apenas a tabela de arestas (from, to, weight).
    Edges {
        /// Formato da tabela.
        #[arg(long, value_enum, default_value = "csv")]
        format: EdgeFormat,

        /// Arquivo de saída (padrão: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Gera o relatório a partir dos dados de exemplo embutidos (sem rede).
    Demo {
        /// Caminho de saída do relatório de demonstração.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

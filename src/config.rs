//! Configuração do scoreflow carregada a partir de `scoreflow.toml`.
//!
//! A struct [`ScoreflowConfig`] contém todos os parâmetros configuráveis,
//! divididos nas seções `[source]` e `[report]`. Valores não presentes no
//! arquivo usam defaults sensíveis. A variável de ambiente
//! `SCOREFLOW_BASE_URL` tem precedência sobre o arquivo.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api;

/// Configuração de nível superior carregada de `scoreflow.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreflowConfig {
    /// Fonte de dados: URL base, recursos e limites de coleta.
    #[serde(default)]
    pub source: SourceConfig,

    /// Documento gerado: metadados, rótulos e saída.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Seção `[source]`: de onde e como coletar.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL base da API de estatísticas.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Caminho do recurso de listagem de entidades.
    #[serde(default = "default_roster_path")]
    pub roster_path: String,

    /// Caminho do recurso de detalhe; `{id}` é substituído pelo identificador.
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Número máximo de entidades coletadas (ausente = elenco inteiro).
    #[serde(default)]
    pub limit: Option<usize>,

    /// Máximo de requisições de detalhe simultâneas.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Timeout de cada requisição, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pula entidades cujo detalhe falhou em vez de abortar a coleta.
    #[serde(default)]
    pub skip_failed: bool,
}

/// Seção `[report]`: o documento em volta do diagrama.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Título do documento gerado.
    #[serde(default = "default_title")]
    pub title: String,

    /// Autor exibido no cabeçalho do documento.
    #[serde(default)]
    pub author: String,

    /// Prefixo dos rótulos de nó, ex.: "Round" → "Round 3: 7".
    #[serde(default = "default_period_label")]
    pub period_label: String,

    /// Caminho do arquivo HTML gerado.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Parágrafo de introdução opcional, antes do diagrama.
    #[serde(default)]
    pub intro: Option<String>,

    /// Dimensões e espaçamento do diagrama.
    #[serde(default)]
    pub diagram: DiagramStyle,
}

/// Seção `[report.diagram]`: estilo passado ao renderizador.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramStyle {
    #[serde(default = "default_diagram_width")]
    pub width: u32,

    #[serde(default = "default_diagram_height")]
    pub height: u32,

    #[serde(default = "default_node_width")]
    pub node_width: u32,

    #[serde(default = "default_node_padding")]
    pub node_padding: u32,
}

// Valor padrão para a URL base: a API pública de fantasy football.
fn default_base_url() -> String {
    api::DEFAULT_BASE_URL.to_string()
}

fn default_roster_path() -> String {
    api::DEFAULT_ROSTER_PATH.to_string()
}

fn default_history_path() -> String {
    api::DEFAULT_HISTORY_PATH.to_string()
}

// Valor padrão para requisições simultâneas: 4.
fn default_max_in_flight() -> usize {
    4
}

// Valor padrão para o timeout de requisição: 30s.
fn default_timeout_secs() -> u64 {
    30
}

fn default_title() -> String {
    "Score flow".to_string()
}

fn default_period_label() -> String {
    "Round".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("report.html")
}

fn default_diagram_width() -> u32 {
    960
}

fn default_diagram_height() -> u32 {
    540
}

fn default_node_width() -> u32 {
    15
}

fn default_node_padding() -> u32 {
    12
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            roster_path: default_roster_path(),
            history_path: default_history_path(),
            limit: None,
            max_in_flight: default_max_in_flight(),
            timeout_secs: default_timeout_secs(),
            skip_failed: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: String::new(),
            period_label: default_period_label(),
            output: default_output(),
            intro: None,
            diagram: DiagramStyle::default(),
        }
    }
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            width: default_diagram_width(),
            height: default_diagram_height(),
            node_width: default_node_width(),
            node_padding: default_node_padding(),
        }
    }
}

impl ScoreflowConfig {
    /// Carrega a configuração de `scoreflow.toml` no diretório atual,
    /// recorrendo aos valores padrão quando o arquivo não existe.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("scoreflow.toml"))
    }

    /// Carrega a configuração de um caminho específico.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ScoreflowConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a URL base.
        if let Ok(url) = std::env::var("SCOREFLOW_BASE_URL")
            && !url.is_empty()
        {
            config.source.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.source.history_path.contains("{id}") {
            bail!("source.history_path must contain the {{id}} placeholder");
        }
        if self.source.max_in_flight == 0 {
            bail!("source.max_in_flight must be at least 1");
        }
        if self.source.limit == Some(0) {
            bail!("source.limit must be greater than zero when set");
        }
        Ok(())
    }
}

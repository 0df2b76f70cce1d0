//! Interface de terminal do scoreflow — barra de progresso e saída colorida.
//!
//! Usa as crates `indicatif` para a barra de progresso e `console` para
//! estilização com cores. O [`FetchProgress`] acompanha visualmente a coleta
//! no terminal e imprime o resumo da execução.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::flow::EntityId;
use crate::pipeline::RunSummary;

/// Indicador visual de progresso para a coleta e geração do relatório.
///
/// Começa como spinner enquanto o elenco é carregado e vira uma barra com
/// posição/total assim que o tamanho do elenco é conhecido. Mensagens de
/// sucesso (verde), falha (vermelho) e aviso (amarelo) são estilizadas.
pub struct FetchProgress {
    // Spinner que vira barra quando o elenco é conhecido.
    pb: ProgressBar,
    // Verde para conclusão com sucesso.
    green: Style,
    // Vermelho para falhas fatais.
    red: Style,
    // Estilo amarelo para avisos de entidade pulada.
    yellow: Style,
}

impl FetchProgress {
    /// Inicia o spinner com a mensagem fornecida.
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Progresso invisível, para testes e para comandos que escrevem em stdout.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Converte o spinner em barra quando o tamanho do elenco é conhecido.
    pub fn roster_ready(&self, total: u64) {
        self.pb.set_length(total);
        self.pb.set_position(0);
        self.pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("invalid template")
                .progress_chars("=>-"),
        );
        self.pb.set_message("fetching histories".to_string());
    }

    /// Incrementa a barra após cada entidade processada.
    pub fn entity_done(&self) {
        self.pb.inc(1);
    }

    /// Exibe um aviso de entidade pulada sem quebrar a barra.
    pub fn warn_skip(&self, id: EntityId, reason: &str) {
        self.pb.println(format!(
            "  {} skipping entity {id}: {reason}",
            self.yellow.apply_to("!")
        ));
    }

    /// Finaliza e limpa a barra sem imprimir mensagem.
    pub fn done(&self) {
        self.pb.finish_and_clear();
    }

    /// Finaliza a barra e exibe o resultado final da execução:
    /// checkmark verde em caso de sucesso, X vermelho em caso de falha.
    pub fn complete(&self, ok: bool, message: &str) {
        self.pb.finish_and_clear();
        if ok {
            println!("  {} {message}", self.green.apply_to("✓"));
        } else {
            println!("  {} {message}", self.red.apply_to("✗"));
        }
    }

    /// Imprime o resumo da execução formatado em JSON com estilo colorido.
    pub fn print_summary(&self, summary: &RunSummary) {
        let style = if summary.skipped.is_empty() {
            &self.green
        } else {
            &self.yellow
        };
        println!();
        println!("{}", style.apply_to("─── Run Summary ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_default()
        );
    }
}

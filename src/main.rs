use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use historico_rural::{
    artifact, render_report, validate_form, ConfigOverrides, RawVisitForm, RefineConfig, Refiner,
};

const SAMPLE_FORM: &str = r#"# Formulário de visita — Programa de Segurança Rural (Vale do Jamari)
visit_date = "2024-05-01"
start_time = "08:00"
end_time = "09:30"
property_kind = "Fazenda" # Sítio | Fazenda | Chácara | Estância
property_name = "São José"
address = "Linha 5, Lote 10, Gleba 02"
municipality = "Ariquemes"
state_code = "RO" # RO | AC | AM | RR | PA | TO | MT | MS | GO | DF
gate_coordinates = "-9.897289, -63.017788"
homestead_coordinates = "-9.897500, -63.017900"
area = 10.0
area_unit = "hectares" # hectares | alqueires
owner_name = "João Silva"
tax_id = "123.456.789-00"
phone = "(69) 99999-0000"
main_activity = "Criação de bovinos"
vehicles = "" # opcional
cattle_brand = "" # opcional
plate_number = "PSR-001"
"#;

#[derive(Debug, Parser)]
#[command(
    name = "historico-rural",
    version,
    about = "Gerador de Histórico Policial — Programa de Segurança Rural (Vale do Jamari)"
)]
struct Cli {
    /// Arquivo de formulário preenchido (.json ou .toml)
    form: Option<PathBuf>,

    /// Diretório onde o histórico final é salvo
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Apenas imprime o histórico, sem salvar arquivo
    #[arg(long)]
    no_save: bool,

    /// Pula o refinamento e emite apenas o texto do template
    #[arg(long)]
    no_refine: bool,

    /// Provedor de refinamento (openai, claude ou ollama)
    #[arg(long)]
    provider: Option<String>,

    /// Modelo usado pelo provedor de refinamento
    #[arg(long)]
    model: Option<String>,

    /// Endpoint do Ollama (padrão http://localhost:11434)
    #[arg(long)]
    endpoint: Option<String>,

    /// Imprime um formulário de exemplo em TOML e sai
    #[arg(long)]
    sample_form: bool,
}

fn read_form(path: &Path) -> Result<RawVisitForm> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("não foi possível ler o formulário {}", path.display()))?;
    let form = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&raw)
            .with_context(|| format!("formulário TOML inválido: {}", path.display()))?,
        Some("json") => serde_json::from_str(&raw)
            .with_context(|| format!("formulário JSON inválido: {}", path.display()))?,
        _ => bail!(
            "formato de formulário não suportado (use .json ou .toml): {}",
            path.display()
        ),
    };
    Ok(form)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(form_path) = cli.form else {
        bail!("informe o arquivo de formulário (ou use --sample-form para gerar um modelo)");
    };

    // Configuration comes first: a missing credential halts the flow before
    // the form is even read.
    let refiner = if cli.no_refine {
        None
    } else {
        let overrides = ConfigOverrides {
            provider: cli.provider.clone(),
            model: cli.model.clone(),
            endpoint: cli.endpoint.clone(),
        };
        Some(Refiner::new(RefineConfig::load(&overrides)?))
    };

    let form = read_form(&form_path)?;
    let record = match validate_form(&form) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("❌ {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("🔄 Gerando histórico...");
    let raw_report = render_report(&record);

    let final_text = match &refiner {
        Some(refiner) => {
            info!("✨ Refinando texto com IA...");
            let outcome = refiner.refine_report(&raw_report).await;
            if let Some(notice) = &outcome.notice {
                eprintln!(
                    "⚠️ Erro ao conectar com o serviço de refinamento: {notice}. \
                     O texto original foi mantido."
                );
            }
            outcome.text
        }
        None => raw_report,
    };

    println!("{final_text}");

    if !cli.no_save {
        let path = artifact::save_report(
            &cli.output_dir,
            record.visit_date,
            &record.property_name,
            &final_text,
        )?;
        info!("💾 Histórico salvo em {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.sample_form {
        print!("{SAMPLE_FORM}");
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_form_parses_and_validates() {
        let form: RawVisitForm = toml::from_str(SAMPLE_FORM).unwrap();
        let record = validate_form(&form).unwrap();
        assert_eq!(record.plate_number, "PSR-001");
        assert_eq!(record.property_name, "São José");
        assert!(record.vehicles.is_empty());
    }

    #[test]
    fn test_read_form_accepts_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        fs::write(
            &path,
            r#"{"property_kind": "Sítio", "state_code": "RO", "area_unit": "alqueires"}"#,
        )
        .unwrap();

        let form = read_form(&path).unwrap();
        assert!(form.visit_date.is_none());
    }

    #[test]
    fn test_read_form_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.txt");
        fs::write(&path, "").unwrap();

        assert!(read_form(&path).is_err());
    }
}

//! Plain-text output artifact for the finished report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// File name derived from the visit date and property name:
/// `historico_YYYY-MM-DD_<name>.txt`. Whitespace becomes `_`; characters
/// that are hostile to file systems become `-`; accented letters are kept.
pub fn report_file_name(visit_date: NaiveDate, property_name: &str) -> String {
    let slug: String = property_name
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect();
    format!("historico_{}_{}.txt", visit_date.format("%Y-%m-%d"), slug)
}

/// Writes the final report under `dir`, creating it if needed, and returns
/// the full path of the written file.
pub fn save_report(
    dir: &Path,
    visit_date: NaiveDate,
    property_name: &str,
    text: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("não foi possível criar o diretório {}", dir.display()))?;
    let path = dir.join(report_file_name(visit_date, property_name));
    fs::write(&path, text)
        .with_context(|| format!("não foi possível salvar o histórico em {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_file_name_combines_date_and_property_name() {
        assert_eq!(
            report_file_name(may_first(), "São José"),
            "historico_2024-05-01_São_José.txt"
        );
    }

    #[test]
    fn test_file_name_strips_path_hostile_characters() {
        assert_eq!(
            report_file_name(may_first(), "Sítio A/B: \"Norte\""),
            "historico_2024-05-01_Sítio_A-B-_-Norte-.txt"
        );
    }

    #[test]
    fn test_save_report_writes_the_exact_text() {
        let dir = tempfile::tempdir().unwrap();
        let text = "Em atendimento à Ordem de Serviço, foi realizada uma visita técnica.";

        let path = save_report(dir.path(), may_first(), "São José", text).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), text);
        assert!(path.ends_with("historico_2024-05-01_São_José.txt"));
    }

    #[test]
    fn test_save_report_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("relatorios").join("2024");

        let path = save_report(&nested, may_first(), "Fazenda Boa Vista", "texto").unwrap();
        assert!(path.exists());
    }
}

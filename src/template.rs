//! 取り込み用テンプレートの生成

use crate::error::Result;
use hire_board_common::SheetKind;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

pub const TEMPLATE_HEADERS: [&str; 8] = [
    "Full Name",
    "Email",
    "Phone",
    "Job Title",
    "Experience",
    "Status",
    "Applied Date",
    "Source",
];

pub const TEMPLATE_ROWS: [[&str; 8]; 2] = [
    [
        "John Doe",
        "john.doe@email.com",
        "+1 (555) 123-4567",
        "Software Engineer",
        "3 years",
        "Applied",
        "2025-01-15",
        "LinkedIn",
    ],
    [
        "Jane Smith",
        "jane.smith@email.com",
        "+1 (555) 987-6543",
        "Product Manager",
        "5 years",
        "Reviewing",
        "2025-01-16",
        "Company Website",
    ],
];

const SHEET_NAME: &str = "Candidates";

/// 既定のファイル名
pub fn default_file_name(kind: SheetKind) -> String {
    format!("candidates_template.{}", kind.extension())
}

/// テンプレートを書き出し、書き出したパスを返す
///
/// `output` がディレクトリなら既定のファイル名で保存する。
pub fn write_template(output: &Path, kind: SheetKind) -> Result<PathBuf> {
    let path = if output.is_dir() {
        output.join(default_file_name(kind))
    } else {
        output.to_path_buf()
    };

    match kind {
        SheetKind::Csv => write_csv(&path)?,
        SheetKind::Excel => write_xlsx(&path)?,
    }

    info!(path = %path.display(), %kind, "template written");
    Ok(path)
}

fn write_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(TEMPLATE_HEADERS)?;
    for row in TEMPLATE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, 20)?;
    }
    for (row, values) in TEMPLATE_ROWS.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

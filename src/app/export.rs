// export.rs
//
// Writers for the three load artifacts referencing the converted images:
// a pipe-delimited .unl load file, a one-column .csv, and a transactional
// .sql insert script for the img_product table. All three are written to
// fixed paths and overwritten on every run.

use crate::app::ImagePair;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const WEBP_DIR: &str = "imagenes_webp";
pub const UNL_FILE: &str = "zimagenes.unl";
pub const CSV_FILE: &str = "zimagenes.csv";
pub const SQL_FILE: &str = "zimagenes.sql";

const CSV_HEADER: &str = "Nombre de la Imagen";
const TABLE: &str = "img_product";

/// Options read from the two checkboxes once per batch run.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExportOptions {
    pub comment_triggers: bool,
    pub include_delete: bool,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_unl(pairs: &[ImagePair], date: &str, path: &Path) -> Result<(), ExportError> {
    fs::write(path, render_unl(pairs, date))?;
    Ok(())
}

pub fn write_csv(pairs: &[ImagePair], path: &Path) -> Result<(), ExportError> {
    fs::write(path, render_csv(pairs))?;
    Ok(())
}

pub fn write_sql(
    pairs: &[ImagePair],
    options: &ExportOptions,
    date: &str,
    path: &Path,
) -> Result<(), ExportError> {
    fs::write(path, render_sql(pairs, options, date))?;
    Ok(())
}

/// One line per pair: `<base>|<webp>|<date>|1`. The trailing `1` is the
/// fixed "predet" flag expected by the batch-import process.
pub fn render_unl(pairs: &[ImagePair], date: &str) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&format!("{}|{}|{}|1\n", pair.original_base, pair.webp_name, date));
    }
    out
}

/// Header row plus one row per pair holding only the converted file name.
pub fn render_csv(pairs: &[ImagePair]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for pair in pairs {
        out.push_str(&csv_field(&pair.webp_name));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// The full insert script: transaction header, trigger disable (optionally
/// commented out), optional DELETE, one INSERT per pair in input order,
/// trigger enable, commit.
pub fn render_sql(pairs: &[ImagePair], options: &ExportOptions, date: &str) -> String {
    let mut sql = String::from(
        "-- Inicio del archivo SQL\n\
         BEGIN WORK;\n\
         SET client_encoding=UTF8;\n\
         SET datestyle = 'ISO,DMY';\n",
    );

    if options.comment_triggers {
        sql.push_str("-- ");
    }
    sql.push_str(&format!("ALTER TABLE {} DISABLE TRIGGER ALL;\n", TABLE));

    if options.include_delete {
        sql.push_str(&format!("DELETE FROM {};\n\n", TABLE));
    }

    for pair in pairs {
        sql.push_str(&format!(
            "INSERT INTO {} (cod_producto, img, fecha_actualizacion, predet) \
             VALUES ('{}', '{}', '{}', 1);\n",
            TABLE,
            sql_quote(&pair.original_base),
            sql_quote(&pair.webp_name),
            date,
        ));
    }

    sql.push_str(&format!(
        "\nALTER TABLE {} ENABLE TRIGGER ALL;\nCOMMIT;\n-- Fin del archivo SQL\n",
        TABLE
    ));
    sql
}

// Embedded quotes would otherwise break the generated literals.
fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}

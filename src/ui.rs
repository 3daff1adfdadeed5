//! Presentación en consola de la sesión.

use crate::extraction::{ExtractionOptions, ExtractionOutcome};
use crate::formatting::format_timestamp;
use crate::metadata::{MetadataFieldModel, render};
use crate::selection::SelectedFile;
use chrono::{DateTime, Local};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const HEADER_WIDTH: usize = 74;

/// Cuerpo que se muestra en lugar del resultado cuando algo falla.
pub const FAILURE_PLACEHOLDER: &str = "No se pudo procesar el archivo.";
const GENERIC_FAILURE: &str = "Ocurrió un error";
const SUCCESS_STATUS: &str = "¡Metadata extraída correctamente!";

pub fn render_header() {
    let border = "─".repeat(HEADER_WIDTH - 2);
    println!("\n{}", style(format!("┌{}┐", border)).cyan());
    println!(
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ ExifLens · Extractor y Editor de Metadata ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    );
    println!("{}\n", style(format!("└{}┘", border)).cyan());
}

pub fn render_intro(exiftool: &Path, options: ExtractionOptions) {
    println!(
        "{}",
        style(format!("Extractor: {}", exiftool.display())).dim()
    );
    render_options(options);
    println!(
        "{}\n",
        style("Escribe 'ayuda' para ver los comandos o 'salir' para terminar.").dim()
    );
}

pub fn render_help() {
    let help_lines = [
        "┌─ Comandos disponibles:",
        "│   abrir <ruta>              Selecciona un archivo",
        "│   quitar | reiniciar        Descarta el archivo y los resultados",
        "│   json si|no                Salida estructurada (-json)",
        "│   numerico si|no            Valores numéricos (-n)",
        "│   extraer                   Ejecuta la extracción",
        "│   ver                       Muestra el resultado actual",
        "│   copiar                    Imprime el resultado sin formato",
        "│   descargar [carpeta]       Guarda <archivo>-metadata.json",
        "│   editar                    Carga el resultado en el editor",
        "│   agregar [etiqueta=valor]  Agrega un campo",
        "│   etiqueta <n> <texto>      Cambia la etiqueta del campo n",
        "│   valor <n> <texto>         Cambia el valor del campo n",
        "│   borrar <n>                Elimina el campo n",
        "│   campos                    Lista los campos editables",
        "└─  salir",
    ];

    for line in help_lines.iter() {
        println!("{}", style(line).cyan().dim());
    }

    println!();
}

pub fn render_selected_file(file: &SelectedFile) {
    let mut table = base_table();
    table.set_header(vec![header_cell("Archivo"), header_cell("Detalle")]);
    table.add_row(property_row("Nombre", file.name()));
    table.add_row(property_row("Tamaño", &file.display_size()));
    table.add_row(property_row(
        "Tipo de contenido",
        file.mime().unwrap_or("Desconocido"),
    ));
    println!("\n{table}\n");
}

pub fn render_options(options: ExtractionOptions) {
    println!(
        "{} {}  {} {}",
        style("JSON:").cyan().bold(),
        toggle_label(options.structured_output),
        style("Numérico:").cyan().bold(),
        toggle_label(options.numeric_output),
    );
}

fn toggle_label(enabled: bool) -> String {
    if enabled {
        style("sí").green().to_string()
    } else {
        style("no").dim().to_string()
    }
}

pub fn render_outcome(outcome: &ExtractionOutcome, extracted_at: Option<&DateTime<Local>>) {
    match outcome {
        ExtractionOutcome::Success { .. } => {
            let status = match extracted_at {
                Some(at) => format!("{SUCCESS_STATUS} ({})", format_timestamp(at)),
                None => SUCCESS_STATUS.to_string(),
            };
            println!("\n{}", style(status).green().bold());
            if let Some(text) = render(outcome) {
                println!("{text}\n");
            }
        }
        ExtractionOutcome::Failure { message, .. } => {
            let (status, body) = failure_lines(message);
            println!("\n{}", style(status).red().bold());
            println!("{}\n", style(body).dim());
        }
    }
}

/// Estado y cuerpo para un fallo: el mensaje recibido y el texto fijo.
pub fn failure_lines(message: &str) -> (&str, &'static str) {
    let status = if message.trim().is_empty() {
        GENERIC_FAILURE
    } else {
        message
    };
    (status, FAILURE_PLACEHOLDER)
}

pub fn render_fields(fields: &MetadataFieldModel) {
    if fields.is_empty() {
        println!(
            "\n{}\n",
            style("El editor está vacío. Usa 'agregar' para crear un campo.").dim()
        );
        return;
    }

    let mut table = base_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Etiqueta"),
        header_cell("Valor"),
    ]);

    for (index, (_, field)) in fields.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(index + 1).fg(Color::DarkGrey),
            Cell::new(&field.tag).fg(Color::Rgb {
                r: 160,
                g: 196,
                b: 255,
            }),
            Cell::new(&field.value).fg(Color::White),
        ]));
    }

    println!("\n{table}\n");
    render_duplicate_warning(fields);
}

/// Avisa que las etiquetas repetidas se reducen a un único valor al exportar.
pub fn render_duplicate_warning(fields: &MetadataFieldModel) {
    if let Some(warning) = duplicate_tags_warning(&fields.duplicate_tags()) {
        println!("{}\n", style(warning).yellow());
    }
}

pub fn duplicate_tags_warning(tags: &[&str]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let listed = tags
        .iter()
        .map(|tag| format!("`{tag}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Etiquetas repetidas: {listed}. Al exportar solo se conserva el último valor de cada una."
    ))
}

/// Texto sin estilos para copiarlo desde la terminal.
pub fn render_plain(text: &str) {
    println!("{text}");
}

pub fn render_notice(message: &str) {
    println!("{}", style(message).dim());
}

pub fn render_success(message: &str) {
    println!("{}", style(message).green());
}

pub fn extraction_spinner(file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["▹▹▹", "▸▹▹", "▹▸▹", "▹▹▸", "▹▹▹"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(
        style(format!("Extrayendo metadata de {file_name}..."))
            .dim()
            .to_string(),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
        .add_attribute(Attribute::Underlined)
}

fn property_row(label: &str, value: &str) -> Row {
    Row::from(vec![
        Cell::new(label).fg(Color::Rgb {
            r: 160,
            g: 196,
            b: 255,
        }),
        Cell::new(value).fg(Color::White),
    ])
}

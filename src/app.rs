use crate::config::Settings;
use crate::errors::SessionError;
use crate::extraction::{ExtractionAdapter, ExtractionOptions};
use crate::metadata::FieldId;
use crate::metadata::export::write_export;
use crate::selection::SelectedFile;
use crate::session::Session;
use crate::ui;
use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::warn;

/// Bucle interactivo. Ctrl+C cancela la extracción en curso o, en el prompt,
/// termina la sesión.
pub async fn run(settings: Settings) -> Result<(), String> {
    let mut state = AppState::new(&settings);

    ui::render_header();
    ui::render_intro(&settings.exiftool_path, state.session.options());

    let mut lines = spawn_input_reader();
    let mut interrupts = Interrupts::listen();
    let farewell = match drive(&mut state, &mut lines, &mut interrupts).await {
        Shutdown::Requested => "Hasta luego!",
        Shutdown::EndOfInput => "\nFin de la entrada. ¡Hasta luego!",
        Shutdown::Interrupted => "\nInterrumpido. ¡Hasta luego!",
    };
    println!("{}", style(farewell).dim());

    Ok(())
}

#[derive(Debug, Eq, PartialEq)]
enum Shutdown {
    Requested,
    EndOfInput,
    Interrupted,
}

async fn drive(
    state: &mut AppState,
    lines: &mut mpsc::Receiver<io::Result<String>>,
    interrupts: &mut Interrupts,
) -> Shutdown {
    loop {
        if let Err(error) = render_prompt(state.session.file()) {
            warn!(%error, "no se pudo mostrar el prompt");
        }

        let line = tokio::select! {
            biased;
            line = lines.recv() => line,
            () = interrupts.next() => return Shutdown::Interrupted,
        };

        match line {
            None => return Shutdown::EndOfInput,
            Some(Err(error)) => eprintln!("Error al leer la entrada: {error}"),
            Some(Ok(line)) => match parse_command(&line) {
                Ok(Command::Empty) => {}
                Ok(Command::Exit) => return Shutdown::Requested,
                Ok(command) => {
                    if let Err(message) = handle_command(state, command, interrupts).await {
                        eprintln!("{}", style(message).red());
                    }
                }
                Err(message) => eprintln!("{}", style(message).yellow()),
            },
        }
    }
}

/// Única suscripción a Ctrl+C mientras dura la aplicación.
struct Interrupts {
    receiver: mpsc::UnboundedReceiver<()>,
}

impl Interrupts {
    fn listen() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            loop {
                if let Err(error) = tokio::signal::ctrl_c().await {
                    warn!(%error, "no se pudo escuchar Ctrl+C");
                    break;
                }
                if sender.send(()).is_err() {
                    break;
                }
            }
        });
        Self::from_receiver(receiver)
    }

    fn from_receiver(receiver: mpsc::UnboundedReceiver<()>) -> Self {
        Self { receiver }
    }

    /// Sin escucha disponible no resuelve nunca.
    async fn next(&mut self) {
        if self.receiver.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

/// Lee stdin en el pool bloqueante. El canal se cierra al llegar al fin de
/// la entrada o tras un error de lectura.
fn spawn_input_reader() -> mpsc::Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel(1);
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        loop {
            let mut buffer = String::new();
            let line = match stdin.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => Ok(buffer.trim_end().to_string()),
                Err(error) => Err(error),
            };
            let failed = line.is_err();
            if sender.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    receiver
}

struct AppState {
    session: Session,
    adapter: ExtractionAdapter,
    export_dir: PathBuf,
}

impl AppState {
    fn new(settings: &Settings) -> Self {
        Self {
            session: Session::new(settings.extraction_options()),
            adapter: ExtractionAdapter::exiftool(&settings.exiftool_path),
            export_dir: settings.export_dir.clone(),
        }
    }

    fn field_at(&mut self, position: usize) -> Result<FieldId, String> {
        let fields = self.session.edit_fields().map_err(|error| error.to_string())?;
        position
            .checked_sub(1)
            .and_then(|index| fields.id_at(index))
            .ok_or_else(|| "Índice fuera de rango. Usa `campos` para ver la lista.".to_string())
    }
}

#[derive(Debug, Eq, PartialEq)]
enum Command {
    Empty,
    Exit,
    Help,
    Open(String),
    Reset,
    Structured(Option<bool>),
    Numeric(Option<bool>),
    Extract,
    Show,
    Copy,
    Download(Option<String>),
    Edit,
    Fields,
    Add { tag: String, value: String },
    SetTag { position: usize, text: String },
    SetValue { position: usize, text: String },
    Remove(usize),
}

fn parse_command(input: &str) -> Result<Command, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }

    let (command, remainder) = match trimmed.split_once(char::is_whitespace) {
        Some((command, remainder)) => (command, remainder.trim()),
        None => (trimmed, ""),
    };

    match command.to_lowercase().as_str() {
        "salir" | "exit" => Ok(Command::Exit),
        "ayuda" | "help" => Ok(Command::Help),
        "abrir" | "open" => {
            if remainder.is_empty() {
                return Err("Debes indicar la ruta del archivo.".to_string());
            }
            Ok(Command::Open(remainder.to_string()))
        }
        "quitar" | "remove" | "reiniciar" | "reset" => Ok(Command::Reset),
        "json" => Ok(Command::Structured(parse_toggle(remainder)?)),
        "numerico" | "numérico" | "n" => Ok(Command::Numeric(parse_toggle(remainder)?)),
        "extraer" | "run" => Ok(Command::Extract),
        "ver" | "show" => Ok(Command::Show),
        "copiar" | "copy" => Ok(Command::Copy),
        "descargar" | "download" => Ok(Command::Download(
            (!remainder.is_empty()).then(|| remainder.to_string()),
        )),
        "editar" | "edit" => Ok(Command::Edit),
        "campos" | "fields" => Ok(Command::Fields),
        "agregar" | "add" => {
            let (tag, value) = remainder.split_once('=').unwrap_or((remainder, ""));
            Ok(Command::Add {
                tag: tag.trim().to_string(),
                value: value.trim().to_string(),
            })
        }
        "etiqueta" | "tag" => {
            let (position, text) = parse_indexed(remainder)?;
            Ok(Command::SetTag { position, text })
        }
        "valor" | "value" => {
            let (position, text) = parse_indexed(remainder)?;
            Ok(Command::SetValue { position, text })
        }
        "borrar" | "delete" => {
            let (position, _) = parse_indexed(remainder)?;
            Ok(Command::Remove(position))
        }
        _ => Err(format!(
            "Comando `{command}` no reconocido. Escribe 'ayuda' para ver las opciones."
        )),
    }
}

fn parse_toggle(input: &str) -> Result<Option<bool>, String> {
    match input.to_lowercase().as_str() {
        "" => Ok(None),
        "si" | "sí" | "on" | "true" => Ok(Some(true)),
        "no" | "off" | "false" => Ok(Some(false)),
        other => Err(format!("Valor `{other}` no válido. Usa 'si' o 'no'.")),
    }
}

fn parse_indexed(input: &str) -> Result<(usize, String), String> {
    let (index, text) = match input.split_once(char::is_whitespace) {
        Some((index, text)) => (index, text.trim()),
        None => (input, ""),
    };

    let position = index
        .parse::<usize>()
        .map_err(|_| "Debes indicar el número del campo.".to_string())?;
    if position == 0 {
        return Err("El índice debe ser positivo.".to_string());
    }

    Ok((position, text.to_string()))
}

async fn handle_command(
    state: &mut AppState,
    command: Command,
    interrupts: &mut Interrupts,
) -> Result<(), String> {
    match command {
        Command::Empty | Command::Exit => {}
        Command::Help => ui::render_help(),
        Command::Open(raw_path) => {
            let file =
                SelectedFile::from_path(Path::new(&raw_path)).map_err(|error| error.to_string())?;
            ui::render_selected_file(&file);
            let session = std::mem::take(&mut state.session);
            state.session = session.select(file);
        }
        Command::Reset => {
            let session = std::mem::take(&mut state.session);
            state.session = session.reset();
            ui::render_notice("Archivo y resultados descartados.");
        }
        Command::Structured(value) => {
            let options = state.session.options();
            update_options(
                state,
                ExtractionOptions {
                    structured_output: value.unwrap_or(!options.structured_output),
                    ..options
                },
            );
        }
        Command::Numeric(value) => {
            let options = state.session.options();
            update_options(
                state,
                ExtractionOptions {
                    numeric_output: value.unwrap_or(!options.numeric_output),
                    ..options
                },
            );
        }
        Command::Extract => run_extraction(state, interrupts).await?,
        Command::Show => show_current(state)?,
        Command::Copy => {
            let text = state
                .session
                .display_text()
                .ok_or_else(|| "No hay resultados para copiar.".to_string())?;
            ui::render_plain(&text);
        }
        Command::Download(directory) => {
            let directory = directory
                .map(PathBuf::from)
                .unwrap_or_else(|| state.export_dir.clone());
            let (file, text) = state
                .session
                .export_contents()
                .map_err(|error| error.to_string())?;
            if let Some(fields) = state.session.fields() {
                ui::render_duplicate_warning(fields);
            }
            let target = write_export(&text, file, &directory).map_err(|error| error.to_string())?;
            ui::render_success(&format!("Metadata guardada en {}", target.display()));
        }
        Command::Edit | Command::Fields => {
            let fields = state.session.edit_fields().map_err(|error| error.to_string())?;
            ui::render_fields(fields);
        }
        Command::Add { tag, value } => {
            let fields = state.session.edit_fields().map_err(|error| error.to_string())?;
            fields.add_field(tag, value);
            ui::render_fields(fields);
        }
        Command::SetTag { position, text } => {
            let id = state.field_at(position)?;
            edit_field(state, id, Some(&text), None)?;
        }
        Command::SetValue { position, text } => {
            let id = state.field_at(position)?;
            edit_field(state, id, None, Some(&text))?;
        }
        Command::Remove(position) => {
            let id = state.field_at(position)?;
            let fields = state.session.edit_fields().map_err(|error| error.to_string())?;
            fields.remove_field(id);
            ui::render_fields(fields);
        }
    }

    Ok(())
}

fn update_options(state: &mut AppState, options: ExtractionOptions) {
    state.session.set_options(options);
    ui::render_options(options);
}

fn edit_field(
    state: &mut AppState,
    id: FieldId,
    tag: Option<&str>,
    value: Option<&str>,
) -> Result<(), String> {
    let fields = state.session.edit_fields().map_err(|error| error.to_string())?;
    fields.update_field(id, tag, value);
    ui::render_fields(fields);
    Ok(())
}

async fn run_extraction(state: &mut AppState, interrupts: &mut Interrupts) -> Result<(), String> {
    let file_name = state
        .session
        .file()
        .map(|file| file.name().to_string())
        .ok_or_else(|| SessionError::NoFileSelected.to_string())?;
    let spinner = ui::extraction_spinner(&file_name);

    let result = state.session.extract(&state.adapter, interrupts.next()).await;
    spinner.finish_and_clear();

    result.map_err(|error| error.to_string())?;
    show_current(state)
}

fn show_current(state: &AppState) -> Result<(), String> {
    if let Some(fields) = state.session.fields() {
        ui::render_fields(fields);
        return Ok(());
    }

    let outcome = state
        .session
        .outcome()
        .ok_or_else(|| "Aún no hay resultados. Usa `extraer`.".to_string())?;
    ui::render_outcome(outcome, state.session.extracted_at());
    Ok(())
}

fn render_prompt(file: Option<&SelectedFile>) -> io::Result<()> {
    let location = file.map(SelectedFile::name).unwrap_or("sin archivo");
    print!(
        "{} {} ",
        style("ExifLens").bold().cyan(),
        style(location).dim()
    );
    print!("{} ", style("›").cyan());
    io::stdout().flush()
}

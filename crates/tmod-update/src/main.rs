use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;
use std::io::Read;
use tmod_tensor::{Tensor, TensorType};
use tmod_update::stream::ObjectFields;
use tmod_update::{
    convert_dimensions_to_mapped, CellReader, Field, JsonCellReader, PartialUpdate, TokenBuffer,
    UpdateConfig, UpdateSpecBuilder, TENSOR_CELLS, UPDATE_MODIFY,
};
use tracing_subscriber::EnvFilter;

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .required(true)
        .help("Field tensor type, e.g. 'tensor(x[2],y{})'")
}

fn update_arg() -> Arg {
    Arg::new("update")
        .long("update")
        .short('u')
        .default_value("-")
        .help("Update payload file ('-' for stdin)")
}

fn cli() -> Command {
    Command::new("tmod")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and apply modify updates to tensor fields")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file with update limits"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level (RUST_LOG overrides)"),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .global(true)
                .default_value("field")
                .help("Field name used in messages"),
        )
        .subcommand(
            Command::new("convert")
                .about("Print the all-mapped form of a tensor type")
                .arg(type_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check an update payload against a field type")
                .arg(type_arg())
                .arg(update_arg()),
        )
        .subcommand(
            Command::new("apply")
                .about("Apply an update payload to an existing value")
                .arg(type_arg())
                .arg(update_arg())
                .arg(
                    Arg::new("existing")
                        .long("existing")
                        .short('e')
                        .help("Existing value file, {\"cells\": [...]}; empty tensor if omitted"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches.get_one::<String>("config"))?;
    let builder = UpdateSpecBuilder::new(config);

    match matches.subcommand() {
        Some(("convert", args)) => {
            let tensor_type = parse_type(args)?;
            println!("{}", convert_dimensions_to_mapped(&tensor_type));
        }
        Some(("validate", args)) => {
            let field = field(args)?;
            let update = read_update(&builder, args, &field)?;
            println!(
                "ok: {} update of {} cells for field '{}'",
                update.operation(),
                update.cells().len(),
                field.name()
            );
        }
        Some(("apply", args)) => {
            let field = field(args)?;
            let update = read_update(&builder, args, &field)?;
            let tensor_type = parse_type(args)?;
            let existing = match args.get_one::<String>("existing") {
                Some(path) => read_existing(path, &tensor_type)?,
                None => Tensor::empty(tensor_type),
            };
            let result = update.apply_to(&existing);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some((other, _)) => bail!("unknown command '{}'", other),
        None => bail!("no command given"),
    }
    Ok(())
}

fn load_config(path: Option<&String>) -> Result<UpdateConfig> {
    let Some(path) = path else {
        return Ok(UpdateConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path))?;
    let config = UpdateConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config '{}'", path))?;
    tracing::debug!("Loaded config from {}: {:?}", path, config);
    Ok(config)
}

fn parse_type(args: &ArgMatches) -> Result<TensorType> {
    let spec = args
        .get_one::<String>("type")
        .context("missing --type")?;
    spec.parse::<TensorType>()
        .with_context(|| format!("invalid tensor type '{}'", spec))
}

fn field(args: &ArgMatches) -> Result<Field> {
    let name = args
        .get_one::<String>("field")
        .map_or("field", String::as_str);
    Ok(Field::tensor(name, parse_type(args)?))
}

fn read_source(path: &str) -> Result<Value> {
    let text = if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))?
    };
    serde_json::from_str(&text).with_context(|| format!("'{}' is not valid JSON", path))
}

/// Bare `{"operation", "cells"}` payloads and `{"modify": {...}}` wrappers are
/// both accepted.
fn read_update(
    builder: &UpdateSpecBuilder,
    args: &ArgMatches,
    field: &Field,
) -> Result<PartialUpdate> {
    let path = args
        .get_one::<String>("update")
        .map_or("-", String::as_str);
    let value = read_source(path)?;
    let mut stream = TokenBuffer::from_value(&value);

    let wrapped = value
        .as_object()
        .is_some_and(|map| map.contains_key(UPDATE_MODIFY));
    let update = if wrapped {
        match builder.build_field_update(&mut stream, field)? {
            tmod_update::FieldUpdate::Modify(update) => update,
        }
    } else {
        builder.build(&mut stream, field)?
    };
    Ok(update)
}

fn read_existing(path: &str, tensor_type: &TensorType) -> Result<Tensor> {
    let value = read_source(path)?;
    let mut stream = TokenBuffer::from_value(&value);
    let fields = ObjectFields::enter(&stream)?;
    let mut tensor = None;
    while let Some(key) = fields.next_field(&mut stream)? {
        if key != TENSOR_CELLS {
            bail!("unexpected key '{}' in existing value", key);
        }
        tensor = Some(JsonCellReader::new().read_cells(&mut stream, tensor_type)?);
    }
    let tensor = tensor.with_context(|| format!("'{}' has no '{}'", path, TENSOR_CELLS))?;
    tracing::debug!("Read existing value with {} cells", tensor.len());
    Ok(tensor)
}

// src/param_resolver.rs
//! 参数文件与命令行覆盖的合并。
//!
//! 命令行选项由参考参数字典动态生成：必填参数的文本经过类型推断，
//! 带默认值的参数的文本被转换为默认值的类型。`-d/--description` 与
//! `-i/--index` 在此之前单独提取。
use crate::autocast::{coerce, infer};
use crate::error::{CastError, ResolveError};
use crate::models::{
    ParamEntry, ParamKind, ParamMap, ParamReference, ParamValue, RunMetadata, option_flag,
};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;
use std::error::Error as _;
use tracing::{debug, info};

/// 描述串的固定字段
const SEED_KEY: &str = "seed";
const DATASET_KEY: &str = "dataset_id";

/// clap 内置帮助选项
const HELP_FLAG: &str = "help";

/// 解析完成的一次运行：最终参数与运行元数据
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub params: ParamMap,
    pub metadata: RunMetadata,
}

/// 从命令行提取的运行级选项
#[derive(Debug, Clone, PartialEq, Default)]
struct MetaArgs {
    description: Option<String>,
    index: i64,
}

// ————————————————————————————————————————————————————————————————————————
// 运行级选项：-d/--description 与 -i/--index
// ————————————————————————————————————————————————————————————————————————
fn meta_command() -> Command {
    Command::new("run")
        .no_binary_name(true)
        .disable_help_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new("description")
                .short('d')
                .long("description")
                .action(ArgAction::Set)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("index")
                .short('i')
                .long("index")
                .action(ArgAction::Set)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64))
                .default_value("0"),
        )
}

enum MetaToken {
    // 值在下一个参数中，例如 `-d foo`
    Separate,
    // 值已附在同一个参数中，例如 `-dfoo`、`--index=3`
    Attached,
}

fn meta_token(arg: &str) -> Option<MetaToken> {
    match arg {
        "-d" | "--description" | "-i" | "--index" => Some(MetaToken::Separate),
        _ if arg.starts_with("--description=") || arg.starts_with("--index=") => {
            Some(MetaToken::Attached)
        }
        _ if !arg.starts_with("--") && (arg.starts_with("-d") || arg.starts_with("-i")) => {
            Some(MetaToken::Attached)
        }
        _ => None,
    }
}

/// 从argv中取出运行级选项，返回 (运行级选项, 剩余参数)。
/// `--` 之后的内容原样保留。
pub fn split_meta_args(argv: &[String]) -> (Vec<String>, Vec<String>) {
    let mut meta = Vec::new();
    let mut rest = Vec::new();
    let mut iter = argv.iter();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            rest.push(arg.clone());
            rest.extend(iter.cloned());
            break;
        }
        match meta_token(arg) {
            Some(MetaToken::Separate) => {
                meta.push(arg.clone());
                if let Some(value) = iter.next() {
                    meta.push(value.clone());
                }
            }
            Some(MetaToken::Attached) => meta.push(arg.clone()),
            None => rest.push(arg.clone()),
        }
    }
    (meta, rest)
}

fn parse_meta_args(meta_args: &[String]) -> Result<MetaArgs, ResolveError> {
    let matches = meta_command()
        .try_get_matches_from(meta_args)
        .map_err(|e| ResolveError::InvalidArguments(e.to_string()))?;

    Ok(MetaArgs {
        description: matches.get_one::<String>("description").cloned(),
        index: matches.get_one::<i64>("index").copied().unwrap_or(0),
    })
}

/// 只解析运行级选项，描述原样使用，不生成描述串
pub fn parse_run_metadata(argv: &[String]) -> Result<RunMetadata, ResolveError> {
    let meta = parse_meta_args(argv)?;
    Ok(RunMetadata::new(meta.index, meta.description))
}

// ————————————————————————————————————————————————————————————————————————
// 每个参数对应一个选项
// ————————————————————————————————————————————————————————————————————————
fn param_arg(name: &str, entry: &ParamEntry) -> Arg {
    let flag = option_flag(name);
    let arg = Arg::new(name.to_string())
        .long(flag.clone())
        .value_name("VALUE")
        .action(ArgAction::Set)
        .allow_negative_numbers(true);

    match entry {
        ParamEntry::Required => arg
            .help("required, type inferred from the value")
            .value_parser(move |raw: &str| {
                infer(raw).map_err(|e| cast_error_to_resolve(e, &flag, raw))
            }),
        ParamEntry::Default(default) => {
            let default = default.clone();
            arg.help(format!("default: {}", default.to_cli_string()))
                .value_parser(move |raw: &str| {
                    coerce(&default, raw).map_err(|e| cast_error_to_resolve(e, &flag, raw))
                })
        }
    }
}

fn cast_error_to_resolve(error: CastError, flag: &str, raw: &str) -> ResolveError {
    match error {
        CastError::Mismatch { kind, .. } => ResolveError::TypeCoercion {
            flag: flag.to_string(),
            raw: raw.to_string(),
            expected: kind,
        },
        CastError::NotAList(_) => ResolveError::TypeCoercion {
            flag: flag.to_string(),
            raw: raw.to_string(),
            expected: ParamKind::List,
        },
        CastError::Heterogeneous { .. } => ResolveError::HeterogeneousList {
            flag: flag.to_string(),
            raw: raw.to_string(),
        },
        CastError::OutOfRange { .. } => ResolveError::IntegerOutOfRange {
            flag: flag.to_string(),
            raw: raw.to_string(),
        },
    }
}

/// 检查参数名能否一一映射为命令行选项：选项不能重复，也不能占用 `--help`
fn check_option_flags(reference: &ParamReference) -> Result<(), ResolveError> {
    let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, _) in reference.iter() {
        if name.is_empty() || name.starts_with('-') {
            return Err(ResolveError::InvalidArguments(format!(
                "parameter name '{}' cannot be used as a command-line option",
                name
            )));
        }
        owners.entry(option_flag(name)).or_default().push(name.clone());
    }

    match owners
        .into_iter()
        .find(|(flag, names)| names.len() > 1 || flag == HELP_FLAG)
    {
        Some((flag, names)) => Err(ResolveError::ConflictingOption { flag, names }),
        None => Ok(()),
    }
}

/// 根据参考参数字典构建命令行结构
pub fn build_command(reference: &ParamReference) -> Result<Command, ResolveError> {
    check_option_flags(reference)?;
    Ok(reference.iter().fold(
        Command::new("params")
            .no_binary_name(true)
            .args_override_self(true),
        |cmd, (name, entry)| cmd.arg(param_arg(name, entry)),
    ))
}

/// clap 的取值校验错误里带着我们自己的错误，取出来以保留类型
fn clap_error_to_resolve(error: clap::Error) -> ResolveError {
    match error.kind() {
        ErrorKind::DisplayHelp => ResolveError::HelpRequested(error.render().to_string()),
        ErrorKind::ValueValidation => error
            .source()
            .and_then(|source| source.downcast_ref::<ResolveError>())
            .cloned()
            .unwrap_or_else(|| ResolveError::InvalidArguments(error.to_string())),
        _ => ResolveError::InvalidArguments(error.to_string()),
    }
}

/// 解析命令行参数，返回覆盖集合：每个参考键都有值。
/// 参考值为 Required 的参数是必填的，类型由文本推断。
pub fn parse_params_from_args(
    reference: &ParamReference,
    argv: &[String],
) -> Result<ParamMap, ResolveError> {
    let matches: ArgMatches = build_command(reference)?
        .try_get_matches_from(argv)
        .map_err(clap_error_to_resolve)?;

    let mut parsed = ParamMap::new();
    for (name, entry) in reference.iter() {
        let value = match (matches.get_one::<ParamValue>(name), entry) {
            (Some(value), _) => value.clone(),
            (None, ParamEntry::Default(default)) => default.clone(),
            (None, ParamEntry::Required) => {
                return Err(ResolveError::MissingRequired {
                    name: name.clone(),
                    flag: option_flag(name),
                });
            }
        };
        parsed.insert(name.clone(), value);
    }
    Ok(parsed)
}

/// 由固定字段（种子、数据集）和可选后缀生成描述串
pub fn build_description(params: &ParamMap, suffix: Option<&str>) -> Result<String, ResolveError> {
    let field = |key: &str| {
        params
            .get(key)
            .map(ParamValue::to_slug_string)
            .ok_or_else(|| ResolveError::MissingSlugField(key.to_string()))
    };

    let mut parts = vec![SEED_KEY.to_string(), field(SEED_KEY)?, field(DATASET_KEY)?];
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        parts.push(suffix.to_string());
    }
    Ok(parts.join("_"))
}

/// `-d` 不以下划线开头时原样使用；以下划线开头时作为描述串的后缀；
/// 没有 `-d` 时只用固定字段生成。
fn derive_description(params: &ParamMap, explicit: Option<&str>) -> Result<String, ResolveError> {
    match explicit {
        Some(desc) => match desc.strip_prefix('_') {
            Some(suffix) => build_description(params, Some(suffix)),
            None => Ok(desc.to_string()),
        },
        None => build_description(params, None),
    }
}

/// 合并文件参数与命令行覆盖，命令行优先
pub fn resolve(reference: &ParamReference, argv: &[String]) -> Result<ResolvedRun, ResolveError> {
    let (meta_args, param_args) = split_meta_args(argv);
    let meta = parse_meta_args(&meta_args)?;
    debug!(?meta_args, ?param_args, "split command line");

    let overrides = parse_params_from_args(reference, &param_args)?;

    let mut params = reference.defaults();
    params.extend(overrides);

    let description = derive_description(&params, meta.description.as_deref())?;
    let metadata = RunMetadata::new(meta.index, Some(description));
    info!(
        index = metadata.index,
        description = metadata.description.as_deref().unwrap_or(""),
        params = params.len(),
        "resolved run parameters"
    );

    Ok(ResolvedRun { params, metadata })
}

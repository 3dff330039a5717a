use anyhow::{Context as _, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use weft_dom::VNode;
use weft_render::{
    Context, RenderOptions, RenderSettings, Template, TraceStack, compile_bundle,
};
use weft_template::{Bundle, CompileOptions, unparse_with};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "weft.toml";

/// `weft.toml`: a `[compile]` and a `[render]` table, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compile: CompileOptions,
    pub render: RenderOptions,
}

impl Config {
    pub fn parse(src: &str) -> Result<Config> {
        toml::from_str(src).context("invalid weft config")
    }

    /// Read `path`, or `weft.toml` in the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG);
                if !fallback.is_file() {
                    return Ok(Config::default());
                }
                fallback
            }
        };
        let src = read(&path)?;
        debug!(path = %path.display(), "loaded config");
        Config::parse(&src).with_context(|| format!("in {}", path.display()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Html,
    Vtree,
    Trace,
}

#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub data: Option<PathBuf>,
    pub partials: Option<PathBuf>,
    pub format: Format,
    pub host: Option<String>,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_template(input: &Path, opts: &CompileOptions) -> Result<Template> {
    let src = read(input)?;
    Template::compile_with(&src, opts)
        .with_context(|| format!("failed to compile {}", input.display()))
}

/// Compiled tree and partial names as pretty JSON.
pub fn compile_cmd(input: &Path, opts: &CompileOptions) -> Result<String> {
    let src = read(input)?;
    let compiled = weft_template::compile_with(&src, opts)
        .with_context(|| format!("failed to compile {}", input.display()))?;
    Ok(serde_json::to_string_pretty(&compiled)?)
}

/// Source text equivalent to the compiled template.
pub fn unparse_cmd(input: &Path, opts: &CompileOptions) -> Result<String> {
    let tpl = load_template(input, opts)?;
    Ok(unparse_with(
        tpl.nodes(),
        &opts.open_delimiter,
        &opts.close_delimiter,
    ))
}

pub fn render_cmd(input: &Path, args: &RenderArgs, config: &Config) -> Result<String> {
    let tpl = load_template(input, &config.compile)?;

    let data = match &args.data {
        Some(path) => serde_json::from_str::<serde_json::Value>(&read(path)?)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
        None => serde_json::Value::Object(Default::default()),
    };
    let ctx = Context::new(data);

    let mut settings = RenderSettings::default().with_options(config.render.clone());
    if let Some(path) = &args.partials {
        let partials = compile_bundle(&read(path)?, &config.compile)
            .with_context(|| format!("failed to load partials from {}", path.display()))?;
        debug!(count = partials.len(), "loaded partials");
        settings = settings.with_partials(partials);
    }
    if let Some(host) = &args.host {
        settings = settings.with_host(host.clone());
    }

    let out = match args.format {
        Format::Html => tpl.to_markup_string_with(&ctx, &settings),
        Format::Vtree => {
            let tree: Vec<VNode> = tpl.to_virtual_tree_with(&ctx, &settings);
            serde_json::to_string_pretty(&tree)?
        }
        Format::Trace => {
            let mut stack = TraceStack::new();
            tpl.render(&ctx, &mut stack, &settings);
            stack.finish()
        }
    };
    Ok(out)
}

/// Template names in a bundle file, one per line.
pub fn bundle_cmd(input: &Path) -> Result<String> {
    let bundle = Bundle::parse(&read(input)?)
        .with_context(|| format!("failed to parse bundle {}", input.display()))?;
    let mut out = String::new();
    for name in bundle.names() {
        out.push_str(name);
        out.push('\n');
    }
    Ok(out)
}

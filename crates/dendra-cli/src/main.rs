use dendra::arbor::FlowCentrality;
use dendra::{
    AnalysisOptions, ArborParser, ExportKind, SynapseClustering, axon_segregation_index,
    cluster_sizes, clusters, find_axon, segregation_index,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Dendra(dendra::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Dendra(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<dendra::Error> for CliError {
    fn from(value: dendra::Error) -> Self {
        Self::Dendra(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Cluster,
    Axon,
    Flow,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    export: ExportKind,
    pretty: bool,
    config: Option<String>,
    bandwidth: Option<f64>,
    fraction: Option<f64>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::default(),
            input: None,
            export: ExportKind::CompactSkeleton,
            pretty: false,
            config: None,
            bandwidth: None,
            fraction: None,
            out: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClusterOut {
    bandwidth: f64,
    clusters: BTreeMap<usize, Vec<u64>>,
    sizes: BTreeMap<usize, usize>,
    segregation_index: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AxonOut {
    cut: Option<u64>,
    nodes: Vec<u64>,
    fc_max_plateau: Vec<u64>,
    fc_zeros: Vec<u64>,
    segregation_index: f64,
}

#[derive(Serialize)]
struct FlowOut {
    centrifugal: f64,
    centripetal: f64,
    sum: f64,
}

impl From<FlowCentrality> for FlowOut {
    fn from(fc: FlowCentrality) -> Self {
        Self {
            centrifugal: fc.centrifugal,
            centripetal: fc.centripetal,
            sum: fc.sum,
        }
    }
}

fn usage() -> &'static str {
    "dendra-cli\n\
\n\
USAGE:\n\
  dendra-cli [cluster] [--bandwidth <lambda>] [--config <path>] [--export compact-skeleton|compact-arbor] [--pretty] [--out <path>] [<path>|-]\n\
  dendra-cli axon [--fraction <f>] [--config <path>] [--export compact-skeleton|compact-arbor] [--pretty] [--out <path>] [<path>|-]\n\
  dendra-cli flow [--export compact-skeleton|compact-arbor] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a skeleton export: a JSON array [nodes, connectors, tags].\n\
  - --config reads analysis options from a JSON file; flags override it.\n\
  - axon and flow print null when the neuron lacks inputs or outputs.\n\
  - Set RUST_LOG=dendra=debug for diagnostics on stderr.\n\
"
}

fn next_number(it: &mut impl Iterator<Item = impl AsRef<str>>) -> Result<f64, CliError> {
    let Some(v) = it.next() else {
        return Err(CliError::Usage(usage()));
    };
    let v = v
        .as_ref()
        .parse::<f64>()
        .map_err(|_| CliError::Usage(usage()))?;
    if !v.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "cluster" => args.command = Command::Cluster,
            "axon" => args.command = Command::Axon,
            "flow" => args.command = Command::Flow,
            "--pretty" => args.pretty = true,
            "--bandwidth" => args.bandwidth = Some(next_number(&mut it)?),
            "--fraction" => args.fraction = Some(next_number(&mut it)?),
            "--export" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.export = kind
                    .parse::<ExportKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match out {
        None => print!("{text}"),
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn load_options(args: &Args) -> Result<AnalysisOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<AnalysisOptions>(&std::fs::read_to_string(path)?)?,
        None => AnalysisOptions::default(),
    };
    if let Some(bandwidth) = args.bandwidth {
        options.bandwidth = bandwidth;
    }
    if let Some(fraction) = args.fraction {
        options.fraction = fraction;
    }
    options.validate()?;
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let options = load_options(&args)?;
    let json: serde_json::Value = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    let (mut parsed, tags) = ArborParser::init(args.export, &json)?;
    if options.reroot_at_soma {
        parsed.reroot_at_soma(&tags);
    }
    if options.collapse_not_a_branch {
        parsed.collapse_artifactual_branches(&tags);
    }
    tracing::info!(
        nodes = parsed.arbor.count_nodes(),
        command = ?args.command,
        "loaded skeleton"
    );

    let out = args.out.as_deref();
    match args.command {
        Command::Cluster => {
            let synapses = parsed.create_synapse_map();
            let sc = SynapseClustering::new(
                &parsed.arbor,
                &parsed.positions,
                &synapses,
                options.bandwidth,
            );
            let map = sc.density_hill_map();
            let clusters = clusters(&map);
            let segregation_index =
                segregation_index(clusters.values(), &parsed.outputs, &parsed.inputs);
            let result = ClusterOut {
                bandwidth: options.bandwidth,
                sizes: cluster_sizes(&map),
                clusters,
                segregation_index,
            };
            write_json(&result, args.pretty, out)
        }
        Command::Axon => {
            let result = find_axon(&parsed, options.fraction, &parsed.positions).map(|axon| {
                let mut nodes = axon.arbor.nodes_array();
                nodes.sort_unstable();
                AxonOut {
                    cut: axon.cut(),
                    segregation_index: axon_segregation_index(&parsed, &axon),
                    nodes,
                    fc_max_plateau: axon.fc_max_plateau,
                    fc_zeros: axon.fc_zeros,
                }
            });
            write_json(&result, args.pretty, out)
        }
        Command::Flow => {
            let result = parsed
                .arbor
                .flow_centrality(
                    &parsed.outputs,
                    &parsed.inputs,
                    parsed.n_outputs,
                    parsed.n_inputs,
                )
                .map(|fc| {
                    fc.into_iter()
                        .map(|(node, fc)| (node, FlowOut::from(fc)))
                        .collect::<BTreeMap<u64, FlowOut>>()
                });
            write_json(&result, args.pretty, out)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

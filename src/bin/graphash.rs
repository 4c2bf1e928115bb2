//! an executable for hashing bundles of labeled graphs into libsvm vectors
//! example usage:
//! graphash embed --input calls/benign --input calls/malware --output vectors.libsvm --mode shortest_paths --minlen 2 --maxlen 3 --bits 20 --norm l2
//! graphash embed --config run.json --input calls --fmap fmap.json
//! graphash stack --input nodes.libsvm --input edges.libsvm --bits 20 --output stacked.libsvm
//! graphash modes
//!
//! graph files are csv files : `n,<node id>,<label fields>...` and `e,<source id>,<target id>` records.
//! The label of a graph is extracted from its file name by --label-regex (default `^\d+`).


use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgMatches, Command};

use graphash::params::MODE_NAMES;
use graphash::prelude::*;


fn parse_value<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<T>>
    where T: FromStr, T::Err: std::fmt::Display {
    match matches.value_of(name) {
        Some(str) => {
            let value = str.parse::<T>().map_err(|e| anyhow!("error parsing --{} {} : {}", name, str, e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
} // end of parse_value


fn paths_of(matches: &ArgMatches, name: &str) -> Vec<PathBuf> {
    matches.values_of(name).map(|v| v.map(PathBuf::from).collect()).unwrap_or_default()
}


/// json config first if any, then explicit flags
fn parse_hash_params(matches: &ArgMatches) -> anyhow::Result<HashParams> {
    let mut params = match matches.value_of("config") {
        Some(path) => HashParams::from_json_file(&PathBuf::from(path)).with_context(|| format!("loading config {}", path))?,
        None => HashParams::default(),
    };
    if let Some(mode) = parse_value::<String>(matches, "mode")? { params.mode = mode; }
    if let Some(bits) = parse_value::<u32>(matches, "bits")? { params.bits = bits; }
    if let Some(map) = parse_value::<String>(matches, "map")? { params.map = map; }
    if let Some(norm) = parse_value::<String>(matches, "norm")? { params.norm = norm; }
    if let Some(size) = parse_value::<usize>(matches, "size")? { params.size = size; }
    if let Some(depth) = parse_value::<usize>(matches, "depth")? { params.depth = depth; }
    if let Some(minlen) = parse_value::<usize>(matches, "minlen")? { params.minlen = minlen; }
    if let Some(maxlen) = parse_value::<usize>(matches, "maxlen")? { params.maxlen = maxlen; }
    if let Some(cutoff) = parse_value::<usize>(matches, "closure_maxlen")? { params.closure_maxlen = Some(cutoff); }
    if let Some(component) = parse_value::<String>(matches, "component")? { params.component = component; }
    if let Some(regex) = parse_value::<String>(matches, "label_regex")? { params.label_regex = regex; }
    if let Some(chunks) = parse_value::<usize>(matches, "chunks")? { params.chunks = chunks; }
    if let Some(threads) = parse_value::<usize>(matches, "threads")? { params.threads = threads; }
    if let Some(fmap) = parse_value::<PathBuf>(matches, "fmap")? { params.fmap = Some(fmap); }
    if matches.is_present("weighted") {
        params.weighted = true;
    }
    log::debug!("hash parameters : {:?}", params);
    Ok(params)
} // end of parse_hash_params


fn embed(matches: &ArgMatches) -> anyhow::Result<()> {
    let params = parse_hash_params(matches)?;
    // configuration errors stop here, before any graph is read
    let pipeline = Pipeline::from_params(&params).context("invalid configuration")?;
    let bundles = paths_of(matches, "input");
    let output = matches.value_of("output").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("graphash.libsvm"));
    log::info!("input bundles : {:?}, output : {:?}", bundles, output);
    let report = pipeline.run(&bundles, &output)?;
    for failure in &report.failures {
        log::error!("{}", failure);
    }
    println!("{} graphs, {} vectors written in {}, {} skipped", report.nb_graphs, report.nb_written,
            output.display(), report.nb_failures());
    Ok(())
} // end of embed


fn stack(matches: &ArgMatches) -> anyhow::Result<()> {
    let inputs = paths_of(matches, "input");
    let bits = parse_value::<u32>(matches, "bits")?.unwrap_or(24);
    let output = matches.value_of("output").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("stacked.libsvm"));
    let nb_records = stack_libsvm(&inputs, bits, &output)?;
    println!("{} records stacked in {}", nb_records, output.display());
    Ok(())
} // end of stack


fn list_modes() {
    let defaults = HashParams::default();
    for (rank, name) in MODE_NAMES.iter().enumerate() {
        let params = HashParams { mode: name.to_string(), ..defaults.clone() };
        match params.bag_mode() {
            Ok(mode) => println!("{} {:<18} {}", rank, name, mode),
            Err(e) => log::error!("{}", e),
        }
    }
} // end of list_modes


fn run() -> anyhow::Result<()> {
    let hash_args = [
        Arg::new("input").long("input").short('i').takes_value(true).multiple_occurrences(true).required(true)
            .help("a directory of graph csv files (a bundle) or one graph file, may be repeated"),
        Arg::new("output").long("output").short('o').takes_value(true).help("libsvm output file, default graphash.libsvm"),
        Arg::new("config").long("config").takes_value(true).help("json file of parameters, overriden by flags"),
        Arg::new("mode").long("mode").short('m').takes_value(true).help("extraction mode, name or id (see modes subcommand)"),
        Arg::new("bits").long("bits").short('b').takes_value(true).help("vectors have dimension 2^bits, default 24"),
        Arg::new("map").long("map").takes_value(true).help("count or binary"),
        Arg::new("norm").long("norm").takes_value(true).help("none, l1 (manhattan), l2 (euclidean)"),
        Arg::new("size").long("size").takes_value(true).help("neighborhood size in hops"),
        Arg::new("depth").long("depth").takes_value(true).help("reachability depth in hops"),
        Arg::new("minlen").long("minlen").takes_value(true).help("minimal length of shortest paths"),
        Arg::new("maxlen").long("maxlen").takes_value(true).help("maximal length of shortest paths"),
        Arg::new("closure_maxlen").long("closure-maxlen").takes_value(true).help("hop cutoff of closure, default none (0 : none)"),
        Arg::new("weighted").long("weighted").help("weight closure pairs by 1/length"),
        Arg::new("component").long("component").takes_value(true).help("strong, weak or attracting"),
        Arg::new("label_regex").long("label-regex").takes_value(true).help("regex extracting the integer label from a file name"),
        Arg::new("chunks").long("chunks").takes_value(true).help("number of chunks a bundle is split in"),
        Arg::new("threads").long("threads").takes_value(true).help("number of worker threads"),
        Arg::new("fmap").long("fmap").takes_value(true).help("dump the feature map in this json file"),
    ];
    //
    let matches = Command::new("graphash")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("embed")
            .about("hash graphs into libsvm vectors")
            .args(&hash_args))
        .subcommand(Command::new("stack")
            .about("concatenate feature spaces of libsvm files of the same corpus")
            .arg(Arg::new("input").long("input").short('i').takes_value(true).multiple_occurrences(true).required(true)
                .help("libsvm file, in stacking order"))
            .arg(Arg::new("bits").long("bits").short('b').takes_value(true).help("bits of the input files, default 24"))
            .arg(Arg::new("output").long("output").short('o').takes_value(true).help("default stacked.libsvm")))
        .subcommand(Command::new("modes")
            .about("list extraction modes"))
        .get_matches();
    //
    match matches.subcommand() {
        Some(("embed", sub_m)) => embed(sub_m),
        Some(("stack", sub_m)) => stack(sub_m),
        Some(("modes", _)) => {
            list_modes();
            Ok(())
        }
        _ => Err(anyhow!("expected subcommand embed, stack or modes")),
    }
} // end of run


pub fn main() {
    //
    env_logger::Builder::from_default_env().init();
    log::info!("logger initialized");
    //
    if let Err(e) = run() {
        log::error!("graphash failed : {:?}", e);
        eprintln!("error : {:#}", e);
        std::process::exit(1);
    }
} // end of main

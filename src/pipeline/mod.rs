//! Corpus orchestration : extraction, hashing and normalization of each graph, in parallel.
//!
//! Each graph is an independent task. Results are collected in corpus order, a graph that fails
//! (unreadable file, invalid graph, degenerate vector) is reported and skipped, the others go on.
//! Feature maps are built per graph and reduced with the union merge, no lock is taken.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use cpu_time::ProcessTime;
use rayon::prelude::*;

use crate::errors::{GraphashError, Result};
use crate::graph::LabeledGraph;
use crate::hashing::{FeatureMap, SparseVector};
use crate::io::bundle::{chunk_ranges, list_bundle};
use crate::io::csv::graph_from_csv;
use crate::io::fmap::write_feature_map;
use crate::io::libsvm::LibsvmWriter;
use crate::params::{HashParams, RunConfig};

pub mod report;

pub use report::*;

type Outcome = std::result::Result<(GraphRecord, Option<FeatureMap>), Failure>;


/// Runs a validated configuration on graphs, with a dedicated thread pool.
pub struct Pipeline {
    config: RunConfig,
    pool: rayon::ThreadPool,
}

impl Pipeline {

    pub fn new(config: RunConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.get_threads())
            .build()
            .map_err(|e| GraphashError::config(format!("cannot build a pool of {} threads : {}", config.get_threads(), e)))?;
        Ok(Pipeline { config, pool })
    }

    /// validates params, any configuration error is returned before a graph is touched
    pub fn from_params(params: &HashParams) -> Result<Self> {
        Pipeline::new(params.validate()?)
    }

    pub fn get_config(&self) -> &RunConfig {
        &self.config
    }

    /// extraction, hashing and normalization of one graph. The feature map is returned if the run collects one.
    pub fn vectorize(&self, graph: &LabeledGraph) -> Result<(SparseVector, Option<FeatureMap>)> {
        let bag = self.config.get_mode().extract(graph);
        let hasher = self.config.get_hasher();
        let (vector, fmap) = if self.config.with_fmap() {
            let (vector, fmap) = hasher.hash_with_map(&bag);
            (vector, Some(fmap))
        } else {
            (hasher.hash_bag(&bag, None), None)
        };
        let vector = self.config.get_normalizer().normalize(vector)?;
        Ok((vector, fmap))
    } // end of vectorize


    fn process_one(&self, index: usize, source: String, graph: Result<LabeledGraph>) -> Outcome {
        let vectorized = graph.and_then(|g| self.vectorize(&g).map(|res| (g, res)));
        match vectorized {
            Ok((graph, (vector, fmap))) => {
                let id = graph.get_id().map(|s| s.to_string());
                let label = self.config.label_of(graph.get_id());
                Ok((GraphRecord { index, id, label, vector }, fmap))
            }
            Err(error) => Err(Failure { index, source, error }),
        }
    } // end of process_one


    // splits outcomes kept in corpus order and reduces feature maps
    fn gather(&self, outcomes: Vec<Outcome>) -> ChunkResult {
        let mut result = ChunkResult::default();
        let mut fmaps = Vec::<FeatureMap>::new();
        for outcome in outcomes {
            match outcome {
                Ok((record, fmap)) => {
                    result.records.push(record);
                    if let Some(fmap) = fmap {
                        fmaps.push(fmap);
                    }
                }
                Err(failure) => {
                    log::warn!("{}", failure);
                    result.failures.push(failure);
                }
            }
        }
        if self.config.with_fmap() {
            let merged = self.pool.install(|| fmaps.into_par_iter().reduce(FeatureMap::new, FeatureMap::merge));
            result.fmap = Some(merged);
        }
        result
    } // end of gather


    /// processes graphs already in memory, indexed from 0
    pub fn process_graphs(&self, graphs: Vec<LabeledGraph>) -> ChunkResult {
        let outcomes: Vec<Outcome> = self.pool.install(|| {
            graphs.into_par_iter().enumerate()
                .map(|(index, graph)| {
                    let source = graph.describe().to_string();
                    self.process_one(index, source, Ok(graph))
                })
                .collect()
        });
        self.gather(outcomes)
    } // end of process_graphs


    /// loads and processes graph files, indexed from first_index
    pub fn process_files(&self, files: &[PathBuf], first_index: usize) -> ChunkResult {
        let outcomes: Vec<Outcome> = self.pool.install(|| {
            files.par_iter().enumerate()
                .map(|(rank, path)| {
                    let source = path.to_string_lossy().into_owned();
                    self.process_one(first_index + rank, source, graph_from_csv(path))
                })
                .collect()
        });
        self.gather(outcomes)
    } // end of process_files


    /// Processes bundles one after the other, each in chunks, and writes one record per graph in corpus order.
    /// Dumps the merged feature map at the end if the configuration asks for it.
    pub fn run(&self, bundles: &[PathBuf], output: &Path) -> Result<RunReport> {
        log::info!("extracting {}, {} bits, map {}, norm {}", self.config.get_mode(), self.config.get_hasher().get_bits(),
                self.config.get_normalizer().get_map().name(), self.config.get_normalizer().get_norm().name());
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let mut report = RunReport::default();
        if self.config.with_fmap() {
            report.fmap = Some(FeatureMap::new());
        }
        let mut writer = LibsvmWriter::new(output, false)?;
        let mut index = 0usize;
        for bundle in bundles {
            let entries = list_bundle(bundle)?;
            let ranges = chunk_ranges(entries.len(), self.config.get_chunks());
            let nb_chunks = ranges.len();
            for (rank, range) in ranges.into_iter().enumerate() {
                log::debug!("bundle {:?} chunk {}/{} : {} graphs", bundle.as_os_str(), rank + 1, nb_chunks, range.len());
                let nb_in_chunk = range.len();
                let chunk = self.process_files(&entries[range], index);
                index += nb_in_chunk;
                for record in &chunk.records {
                    writer.write_record(record.label, &record.vector)?;
                }
                report.absorb(chunk);
            }
            writer.flush()?;
        }
        //
        if let (Some(path), Some(fmap)) = (self.config.get_fmap(), report.fmap.as_ref()) {
            write_feature_map(fmap, path)?;
        }
        log::info!("processed {} graphs, {} records written to {:?}, {} skipped", report.nb_graphs, report.nb_written,
                output.as_os_str(), report.nb_failures());
        log::info!("graphash run sys time(s) {:.2e} cpu time(s) {:.2e}",
                sys_start.elapsed().map(|d| d.as_secs_f64()).unwrap_or(0.), cpu_start.elapsed().as_secs_f64());
        Ok(report)
    } // end of run
} // end of impl Pipeline


//=====================================================================


#[cfg(test)]
mod tests {

    use super::*;

    use rand::Rng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use rand_xoshiro::rand_core::SeedableRng;

    use crate::bags::BagMode;
    use crate::bags::fixtures::*;
    use crate::hashing::murmur3_str;
    use crate::io::csv::graph_to_csv;
    use crate::io::fmap::read_feature_map;
    use crate::io::libsvm::read_libsvm;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn params(mode: &str, bits: u32, norm: &str) -> HashParams {
        HashParams { mode: mode.to_string(), bits, norm: norm.to_string(), threads: 4, ..Default::default() }
    }

    fn random_graph(rng: &mut Xoshiro256PlusPlus, nb_nodes: usize, nb_edges: usize) -> (Vec<String>, Vec<(usize, usize)>) {
        let alphabet = ["A", "B", "C", "D"];
        let labels = (0..nb_nodes).map(|_| alphabet[rng.gen_range(0..alphabet.len())].to_string()).collect();
        let edges = (0..nb_edges).map(|_| (rng.gen_range(0..nb_nodes), rng.gen_range(0..nb_nodes))).collect();
        (labels, edges)
    }

    #[test]
    fn records_keep_corpus_order() {
        log_init_test();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4664397);
        let graphs: Vec<LabeledGraph> = (0..50).map(|i| {
            let (labels, edges) = random_graph(&mut rng, 1 + i % 9, 2 * (i % 7));
            let mut graph = LabeledGraph::from_labels(&labels, &edges).unwrap();
            graph.set_id(&format!("{}_graph", i % 3));
            graph
        }).collect();
        let pipeline = Pipeline::from_params(&params("reachabilities", 12, "l1")).unwrap();
        let expected: Vec<SparseVector> = graphs.iter().map(|g| pipeline.vectorize(g).unwrap().0).collect();
        let result = pipeline.process_graphs(graphs);
        assert!(result.failures.is_empty());
        assert_eq!(result.records.len(), 50);
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.index, i);
            assert_eq!(record.label, (i % 3) as i64);
            assert_eq!(record.vector, expected[i]);
            assert!(record.vector.iter().all(|(dim, _)| dim < 1 << 12));
        }
    } // end of records_keep_corpus_order

    #[test]
    fn degenerate_graph_is_skipped() {
        log_init_test();
        // with 1 bit "A" and "B" both hash to dimension 0 with opposite signs
        let cancelling = LabeledGraph::from_labels(&["A", "B"], &[]).unwrap();
        let graphs = vec![readme(), cancelling, disconnected()];
        let pipeline = Pipeline::from_params(&params("nodes", 1, "l2")).unwrap();
        let result = pipeline.process_graphs(graphs);
        assert_eq!(result.records.iter().map(|r| r.index).collect::<Vec<usize>>(), vec![0, 2]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert!(matches!(result.failures[0].error, GraphashError::DegenerateVector { .. }));
    }

    #[test]
    fn config_error_before_any_graph() {
        let bad = params("nodes", 24, "l3");
        assert!(matches!(Pipeline::from_params(&bad), Err(GraphashError::Config(_))));
    }

    #[test]
    fn empty_graph_gives_empty_record() {
        let pipeline = Pipeline::from_params(&params("closure", 8, "l2")).unwrap();
        let result = pipeline.process_graphs(vec![empty()]);
        assert!(result.failures.is_empty());
        assert!(result.records[0].vector.is_empty());
    }

    #[test]
    fn permutation_invariance() {
        log_init_test();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(456231);
        let modes = [BagMode::Nodes, BagMode::Edges, BagMode::Neighborhoods { size: 2 }, BagMode::Reachabilities { depth: 3 },
                     BagMode::Components(crate::bags::ComponentKind::Strong), BagMode::Components(crate::bags::ComponentKind::Weak),
                     BagMode::Components(crate::bags::ComponentKind::Attracting), BagMode::Closure { maxlen: None, weighted: true }];
        for _ in 0..20 {
            let nb_nodes = rng.gen_range(1..12);
            let nb_edges = rng.gen_range(0..25);
            let (labels, edges) = random_graph(&mut rng, nb_nodes, nb_edges);
            // random permutation of node ids
            let mut perm: Vec<usize> = (0..nb_nodes).collect();
            for i in (1..nb_nodes).rev() {
                perm.swap(i, rng.gen_range(0..=i));
            }
            let mut permuted_labels = vec![String::new(); nb_nodes];
            for (old, new) in perm.iter().enumerate() {
                permuted_labels[*new] = labels[old].clone();
            }
            let permuted_edges: Vec<(usize, usize)> = edges.iter().map(|(u, v)| (perm[*u], perm[*v])).collect();
            let g1 = LabeledGraph::from_labels(&labels, &edges).unwrap();
            let g2 = LabeledGraph::from_labels(&permuted_labels, &permuted_edges).unwrap();
            for mode in &modes {
                let (b1, b2) = (mode.extract(&g1), mode.extract(&g2));
                assert_eq!(b1.sorted_keys(), b2.sorted_keys(), "mode {}", mode);
                for (key, count) in b1.iter() {
                    assert!((b2.get(key).unwrap() - count).abs() < 1.0e-9);
                }
            }
        }
    } // end of permutation_invariance

    #[test]
    fn run_on_bundles() {
        log_init_test();
        let root = std::env::temp_dir().join("graphash_pipeline_test");
        let _ = std::fs::remove_dir_all(&root);
        let (bundle1, bundle2) = (root.join("bundle1"), root.join("bundle2"));
        std::fs::create_dir_all(&bundle1).unwrap();
        std::fs::create_dir_all(&bundle2).unwrap();
        let mut readme_graph = readme();
        readme_graph.set_id("readme");
        graph_to_csv(&readme_graph, &bundle1.join("1_readme.csv")).unwrap();
        graph_to_csv(&disconnected(), &bundle1.join("2_disconnected.csv")).unwrap();
        std::fs::write(bundle1.join("3_broken.csv"), "n,1,A\ne,1,2\n").unwrap();
        graph_to_csv(&chain(), &bundle2.join("4_chain.csv")).unwrap();
        //
        let output = root.join("vectors.libsvm");
        let fmap_path = root.join("fmap.json");
        let mut p = params("edges", 16, "none");
        p.chunks = 2;
        p.fmap = Some(fmap_path.clone());
        let pipeline = Pipeline::from_params(&p).unwrap();
        let report = pipeline.run(&[bundle1, bundle2], &output).unwrap();
        assert_eq!(report.nb_graphs, 4);
        assert_eq!(report.nb_written, 3);
        assert_eq!(report.failures[0].index, 2);
        //
        let records = read_libsvm(&output).unwrap();
        let labels: Vec<i64> = records.iter().map(|r| r.0).collect();
        assert_eq!(labels, vec![1, 2, 4]);
        // disconnected graph has no edge
        assert!(records[1].1.is_empty());
        assert_eq!(records[0].1.len(), 4);
        // feature map is sound and covers the written dimensions
        let fmap = read_feature_map(&fmap_path).unwrap();
        for (label, vector) in &records {
            for (dim, _) in vector.iter() {
                let keys = fmap.get(dim).unwrap();
                assert!(keys.iter().any(|k| murmur3_str(k) & 0xffff == dim), "label {} dim {}", label, dim);
            }
        }
        assert!(fmap.iter().any(|(_, keys)| keys.contains("B-B")));
    } // end of run_on_bundles
} // end of mod tests

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use wildcard_hierarchy::config::HierarchyOptions;
use wildcard_hierarchy::file_format::coco::read_coco_annotations;
use wildcard_hierarchy::file_format::imagenet::{load_id_set, load_valid_wnids, load_wnids};
use wildcard_hierarchy::file_format::openimages::{
    read_class_descriptions, read_openimages_hierarchy,
};
use wildcard_hierarchy::file_format::taxonomy_json::read_taxonomy;
use wildcard_hierarchy::filter::DEFAULT_BLACKLIST;
use wildcard_hierarchy::logging::init_logging_with_default;
use wildcard_hierarchy::output::{save_hierarchy, summarize};
use wildcard_hierarchy::pipeline::{
    generate_coco_hierarchy, generate_openimages_hierarchy, generate_tree_hierarchy,
    generate_wnid_hierarchy, HierarchyReport,
};

/// Used when imagenet-wnid is given nothing to work from.
const SAMPLE_WNIDS: &[&str] = &["n02084071", "n02113799", "n07753592"];

#[derive(Parser)]
#[command(version, about = "Wildcard hierarchy generator")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a hierarchy from a list of WNIDs (bottom-up)
    ImagenetWnid {
        /// WNIDs, synset names, or paths to files with one id per line
        inputs: Vec<String>,

        #[command(flatten)]
        taxonomy: TaxonomyArgs,

        /// Longest leaf-to-ancestor path, counting the leaf; 0 walks to the root
        #[arg(long, default_value_t = 0)]
        max_hypernym_depth: u32,

        #[arg(long, default_value_t = 3)]
        depth: usize,

        #[arg(short, long, default_value = "imagenet_hierarchy.yaml")]
        output: PathBuf,
    },
    /// Build a hierarchy recursively from a root synset (top-down)
    ImagenetTree {
        #[command(flatten)]
        taxonomy: TaxonomyArgs,

        #[arg(long, default_value = "animal.n.01")]
        root: String,

        /// Levels of nesting before subtrees are flattened into lists
        #[arg(long, default_value_t = 3)]
        depth: usize,

        /// Only keep leaves listed in this ImageNet class index JSON
        #[arg(long)]
        filter: Option<PathBuf>,

        /// Only keep leaves listed in this plain id list (e.g. ImageNet-21k)
        #[arg(long, conflicts_with = "filter")]
        filter_list: Option<PathBuf>,

        #[arg(short, long, default_value = "wildcards_imagenet.yaml")]
        output: PathBuf,
    },
    /// Build a hierarchy from COCO annotations
    Coco {
        /// COCO instances annotation JSON
        annotations: PathBuf,

        #[arg(long, default_value_t = 3)]
        depth: usize,

        #[arg(short, long, default_value = "wildcards_coco.yaml")]
        output: PathBuf,
    },
    /// Build a hierarchy from Open Images data
    Openimages {
        /// bbox_labels_600_hierarchy.json
        hierarchy: PathBuf,

        /// Class descriptions CSV mapping label ids to names
        classes: PathBuf,

        #[arg(long, default_value_t = 3)]
        depth: usize,

        #[arg(short, long, default_value = "wildcards_openimages.yaml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct TaxonomyArgs {
    /// Lexical database exported as JSON synset records
    #[arg(long = "taxonomy", env = "WILDCARD_TAXONOMY")]
    taxonomy_path: PathBuf,

    /// TOML file with run options; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prune the default uninformative high-level categories
    #[arg(long)]
    default_blacklist: bool,

    /// Additional category labels to prune
    #[arg(long = "blacklist", value_delimiter = ',')]
    blacklist: Vec<String>,

    /// Keep secondary word senses too
    #[arg(long)]
    all_senses: bool,
}

impl TaxonomyArgs {
    fn options(&self) -> Result<HierarchyOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => HierarchyOptions::from_toml_file(path)?,
            None => HierarchyOptions::default(),
        };
        if self.default_blacklist {
            options
                .blacklist
                .extend(DEFAULT_BLACKLIST.iter().map(|s| s.to_string()));
        }
        options.blacklist.extend(self.blacklist.iter().cloned());
        if self.all_senses {
            options.primary_sense_only = false;
        }
        Ok(options)
    }
}

fn finish(report: HierarchyReport, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !report.unresolved.is_empty() {
        warn!(count = report.unresolved.len(), ids = ?report.unresolved, "some ids could not be resolved");
    }
    save_hierarchy(&report.document, output)?;
    info!(
        dropped = report.dropped,
        flattened = report.flattened,
        "{}",
        summarize(&report.document)
    );
    println!("{}", summarize(&report.document));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging_with_default(if cli.verbose {
        "wildcard_hierarchy=debug,hierarchy_tool=debug"
    } else {
        "wildcard_hierarchy=info,hierarchy_tool=info"
    });

    match cli.command {
        Command::ImagenetWnid {
            inputs,
            taxonomy,
            max_hypernym_depth,
            depth,
            output,
        } => {
            let wnids = if inputs.is_empty() {
                info!("no input provided, using sample ids");
                SAMPLE_WNIDS.iter().map(|s| s.to_string()).collect()
            } else {
                load_wnids(&inputs)
            };
            if wnids.is_empty() {
                warn!("no WNIDs to process");
                return Ok(());
            }

            let mut options = taxonomy.options()?;
            options.max_depth = depth;
            options.max_hypernym_depth = match max_hypernym_depth {
                0 => None,
                n => Some(n),
            };
            let db = read_taxonomy(&taxonomy.taxonomy_path)?;
            info!(ids = wnids.len(), "processing ids bottom-up");
            finish(generate_wnid_hierarchy(&db, &wnids, &options)?, &output)
        }
        Command::ImagenetTree {
            taxonomy,
            root,
            depth,
            filter,
            filter_list,
            output,
        } => {
            let mut options = taxonomy.options()?;
            options.root_id = root;
            options.max_depth = depth;
            let valid = match (&filter, &filter_list) {
                (Some(path), _) => Some(load_valid_wnids(path)?),
                (None, Some(path)) => Some(load_id_set(path)?),
                (None, None) => None,
            };
            if let Some(valid) = valid {
                info!(count = valid.len(), "filtering leaves by valid ids");
                options.valid_ids = Some(valid.iter().map(|id| id.to_string()).collect());
            }

            let db = read_taxonomy(&taxonomy.taxonomy_path)?;
            info!(root = options.root_id.as_str(), max_depth = depth, "building top-down");
            finish(generate_tree_hierarchy(&db, &options)?, &output)
        }
        Command::Coco {
            annotations,
            depth,
            output,
        } => {
            let pairs = read_coco_annotations(&annotations)?.category_pairs();
            finish(generate_coco_hierarchy(&pairs, depth)?, &output)
        }
        Command::Openimages {
            hierarchy,
            classes,
            depth,
            output,
        } => {
            let names = read_class_descriptions(&classes)?;
            let root = read_openimages_hierarchy(&hierarchy)?;
            finish(generate_openimages_hierarchy(&root, &names, depth)?, &output)
        }
    }
}

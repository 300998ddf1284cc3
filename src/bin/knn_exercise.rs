use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use knn_classroom::config::GaussianClass;
use knn_classroom::datasets::{rand_bi_gauss, rand_checkers, rand_clown, rand_gauss, rand_tri_gauss};
use knn_classroom::{Dataset, DecisionGrid, ErrorCurve, ExperimentConfig, KnnClassifier};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "knn-exercise")]
#[command(about = "k-nearest-neighbors classroom exercise, in text form")]
#[command(version)]
struct Args {
    /// Seed for every synthetic dataset
    #[arg(long)]
    seed: Option<u64>,

    /// Default log level; `RUST_LOG` overrides it
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the synthetic datasets and print their class counts
    Datasets,
    /// Compare the home-made classifier on the tri-Gaussian split
    Compare,
    /// Print ASCII decision maps for each dataset
    Frontier,
    /// Accuracy for a range of k, train vs test score and the checkerboard error curve
    Sweep,
    /// Digits dataset: accuracy per k, confusion matrix, leave-one-out curve
    #[cfg(feature = "digits")]
    Digits,
}

struct Datasets {
    bi_gauss: Dataset<f64, i32>,
    tri_gauss: Dataset<f64, i32>,
    clown: Dataset<f64, i32>,
    checkers: Dataset<f64, i32>,
}

impl Datasets {
    fn named(&self) -> [(&'static str, &Dataset<f64, i32>); 4] {
        [
            ("bi-gauss", &self.bi_gauss),
            ("tri-gauss", &self.tri_gauss),
            ("clown", &self.clown),
            ("checkers", &self.checkers),
        ]
    }
}

fn generate(config: &ExperimentConfig, rng: &mut StdRng) -> CliResult<Datasets> {
    let GaussianClass { n, mu, sigma } = &config.gauss;
    let blob = rand_gauss(rng, *n, mu, sigma)?;
    info!(points = blob.len(), "single gaussian blob");

    let [b1, b2] = &config.bi_gauss;
    let bi_gauss = rand_bi_gauss(rng, b1.n, b2.n, &b1.mu, &b2.mu, &b1.sigma, &b2.sigma)?;

    let [t1, t2, t3] = &config.tri_gauss;
    let tri_gauss = rand_tri_gauss(
        rng, t1.n, t2.n, t3.n, &t1.mu, &t2.mu, &t3.mu, &t1.sigma, &t2.sigma, &t3.sigma,
    )?;

    let c = &config.clown;
    let clown = rand_clown(rng, c.n1, c.n2, c.sigma1, c.sigma2)?;

    let ch = &config.checkers;
    let checkers = rand_checkers(rng, ch.n1, ch.n2, ch.sigma)?;

    Ok(Datasets {
        bi_gauss,
        tri_gauss,
        clown,
        checkers,
    })
}

fn print_datasets(data: &Datasets) {
    for (name, ds) in data.named() {
        let counts: Vec<String> = ds
            .classes()
            .iter()
            .map(|class| format!("{class}: {}", ds.labels.iter().filter(|l| *l == class).count()))
            .collect();
        println!("{name:<10} {} points, {} features, classes [{}]", ds.len(), ds.n_features(), counts.join(", "));
    }
}

fn compare(config: &ExperimentConfig, data: &Datasets) -> CliResult<()> {
    let (train, test) = data.tri_gauss.split_alternating();
    let mut knn = KnnClassifier::new(config.compare_k);
    let accuracy = knn.fit(&train.features, &train.labels)?.score(&test.features, &test.labels)?;
    println!("home-made KNN (k = {}): accuracy {accuracy:.4}", config.compare_k);

    #[cfg(feature = "reference")]
    {
        let reference = reference::accuracy(&train, &test, config.compare_k)?;
        println!("smartcore KNN (k = {}): accuracy {reference:.4}", config.compare_k);
    }
    Ok(())
}

fn frontier(config: &ExperimentConfig, data: &Datasets) -> CliResult<()> {
    for (name, ds) in data.named() {
        let mut knn = KnnClassifier::new(config.frontier_k);
        knn.fit(&ds.features, &ds.labels)?;
        let grid = DecisionGrid::sample(&knn, &ds.features, config.frontier_step)?;
        let legend: Vec<String> = grid.classes().iter().map(|c| c.to_string()).collect();
        println!("{name} (k = {}, classes in glyph order: {})", config.frontier_k, legend.join(" "));
        print!("{}", grid.render_ascii());
        println!();
    }
    Ok(())
}

fn sweep(config: &ExperimentConfig, data: &Datasets, rng: &mut StdRng) -> CliResult<()> {
    let (train, test) = data.tri_gauss.split_alternating();
    println!("tri-gauss test accuracy per k");
    for &k in &config.sweep_k {
        let mut knn = KnnClassifier::new(k);
        let accuracy = knn.fit(&train.features, &train.labels)?.score(&test.features, &test.labels)?;
        println!("  k = {k:>3}: {accuracy:.4}");
    }

    let mut knn = KnnClassifier::new(1);
    knn.fit(&train.features, &train.labels)?;
    println!(
        "k = 1 score on train data {:.4}, on test data {:.4}",
        knn.score(&train.features, &train.labels)?,
        knn.score(&test.features, &test.labels)?
    );

    let ch = &config.error_curve_checkers;
    let (train, test) = rand_checkers(rng, ch.n1, ch.n2, ch.sigma)?.split_alternating();
    let mut curve = ErrorCurve::new(config.error_curve_k.clone());
    curve.fit_curve(&train.features, &train.labels, &test.features, &test.labels)?;
    println!("checkers error curve");
    for (k, error) in curve.k_range.iter().zip(&curve.errors) {
        println!("  k = {k:>3}: error {error:.4}");
    }
    if let Some(best) = curve.best_k() {
        println!("best k on held-out checkers: {best}");
    }
    Ok(())
}

#[cfg(feature = "reference")]
mod reference {
    use knn_classroom::{accuracy_score, Dataset};
    use smartcore::linalg::basic::matrix::DenseMatrix;
    use smartcore::metrics::distance::euclidian::Euclidian;
    use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};

    use super::CliResult;

    /// Accuracy of smartcore's KNN on the same split.
    pub fn accuracy(train: &Dataset<f64, i32>, test: &Dataset<f64, i32>, k: usize) -> CliResult<f64> {
        let x_train = DenseMatrix::from_2d_vec(&train.features);
        let x_test = DenseMatrix::from_2d_vec(&test.features);
        let knn: KNNClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>, Euclidian<f64>> =
            KNNClassifier::fit(&x_train, &train.labels, KNNClassifierParameters::default().with_k(k))?;
        let predicted = knn.predict(&x_test)?;
        Ok(accuracy_score(&test.labels, &predicted)?)
    }
}

#[cfg(feature = "digits")]
fn digits(config: &ExperimentConfig) -> CliResult<()> {
    use knn_classroom::{ConfusionMatrix, LooCurve};

    let raw = smartcore::dataset::digits::load_dataset();
    let features: Vec<Vec<f64>> = raw
        .data
        .chunks(raw.num_features)
        .map(|row| row.iter().map(|&v| v as f64).collect())
        .collect();
    let labels: Vec<i32> = raw.target.iter().map(|&t| t as i32).collect();
    let digits = Dataset::new(features, labels);
    info!(samples = digits.len(), features = digits.n_features(), "digits loaded");

    let (train, test) = digits.split_at(digits.len() / 2);
    println!("digits test accuracy per k");
    for &k in &config.digits_k {
        let mut knn = KnnClassifier::new(k);
        let accuracy = knn.fit(&train.features, &train.labels)?.score(&test.features, &test.labels)?;
        println!("  k = {k:>3}: {accuracy:.4}");
    }

    let mut knn = KnnClassifier::new(config.confusion_k);
    let predicted = knn.fit(&train.features, &train.labels)?.predict(&test.features)?;
    let matrix = ConfusionMatrix::new(&test.labels, &predicted)?;
    println!("confusion matrix (k = {}), rows = truth, columns = prediction", config.confusion_k);
    print!("{matrix}");

    let mut loo = LooCurve::new(config.loo_k.clone()).with_iterations(config.loo_iterations, config.seed);
    loo.fit_curve(&digits.features, &digits.labels)?;
    println!("leave-one-out accuracy ({} draws per k)", config.loo_iterations);
    for (k, score) in loo.k_range.iter().zip(&loo.cv_scores) {
        println!("  k = {k:>3}: {score:.4}");
    }
    if let Some(best) = loo.best_k() {
        println!("best k by leave-one-out: {best}");
    }
    Ok(())
}

fn main() -> CliResult<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level.into()).into())
        .from_env_lossy();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let mut config = ExperimentConfig::default();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, command = ?args.command, "starting");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let data = generate(&config, &mut rng)?;

    match args.command {
        Command::Datasets => print_datasets(&data),
        Command::Compare => compare(&config, &data)?,
        Command::Frontier => frontier(&config, &data)?,
        Command::Sweep => sweep(&config, &data, &mut rng)?,
        #[cfg(feature = "digits")]
        Command::Digits => digits(&config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parses_known_names() {
        let args = Args::try_parse_from(["knn-exercise", "--log-level", "trace", "datasets"]).unwrap();
        assert_eq!(args.log_level, LogLevel::Trace);
        assert_eq!(Level::from(args.log_level), Level::TRACE);

        let args = Args::try_parse_from(["knn-exercise", "sweep"]).unwrap();
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(matches!(args.command, Command::Sweep));
    }

    #[test]
    fn test_log_level_rejects_unknown_names() {
        assert!(Args::try_parse_from(["knn-exercise", "--log-level", "verbose", "datasets"]).is_err());
        assert!(Args::try_parse_from(["knn-exercise", "--log-level", "warnn", "datasets"]).is_err());
    }
}

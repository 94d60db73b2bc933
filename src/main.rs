// Student Analytics Engine - Main executable
// Author: Gabriel Demetrios Lafis

use std::io;

use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};

use student_analytics_engine::{
    api::{
        AggregateRequest, Aggregation, CorrelationRequest, PivotRequest, QueryEngine,
    },
    data::{Record, Student, Value},
    processing::{
        percentile_rank, resolve_field, summarize, ComparisonOperator, ProcessingError,
        RangeBuckets, SortOrder,
    },
    report,
    storage::{load_store, RecordStore},
    utils::{init_logging, Config},
};

fn cli() -> Command<'static> {
    Command::new("Student Analytics Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Query, aggregate and analyse student enrollment records")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::new("dataset")
                .short('d')
                .long("dataset")
                .value_name("FILE")
                .help("JSON or YAML file with the students")
                .takes_value(true),
        )
        .subcommand(
            Command::new("filter")
                .about("List students matching FIELD OP VALUE")
                .arg(Arg::new("field").long("field").takes_value(true).required(true))
                .arg(Arg::new("op").long("op").takes_value(true).required(true))
                .arg(Arg::new("value").long("value").takes_value(true).required(true)),
        )
        .subcommand(
            Command::new("group")
                .about("Group students and aggregate each group")
                .arg(
                    Arg::new("by")
                        .long("by")
                        .takes_value(true)
                        .required(true)
                        .help("Comma-separated grouping fields"),
                )
                .arg(
                    Arg::new("agg")
                        .long("agg")
                        .takes_value(true)
                        .multiple_occurrences(true)
                        .help("FUNCTION:FIELD, e.g. avg:gpa"),
                )
                .arg(Arg::new("csv").long("csv").help("Write CSV instead of a text table")),
        )
        .subcommand(
            Command::new("stats")
                .about("Summary statistics of a numeric field")
                .arg(Arg::new("field").long("field").takes_value(true).required(true))
                .arg(
                    Arg::new("rank")
                        .long("rank")
                        .takes_value(true)
                        .help("Also report the percentile rank of this value"),
                ),
        )
        .subcommand(
            Command::new("correlate")
                .about("Pearson correlation of two numeric fields")
                .arg(Arg::new("x").long("x").takes_value(true).required(true))
                .arg(Arg::new("y").long("y").takes_value(true).required(true)),
        )
        .subcommand(
            Command::new("outliers")
                .about("Values of a numeric field with a large z-score")
                .arg(Arg::new("field").long("field").takes_value(true).required(true))
                .arg(Arg::new("threshold").long("threshold").takes_value(true)),
        )
        .subcommand(
            Command::new("pivot")
                .about("Course grades per major and grade range")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .takes_value(true)
                        .possible_values(["text", "csv"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("sort")
                .about("List students ordered by a field")
                .arg(Arg::new("field").long("field").takes_value(true).required(true))
                .arg(Arg::new("desc").long("desc").help("Sort descending")),
        )
        .subcommand(Command::new("report").about("Full report over the dataset"))
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config file: {}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    // Initialize logging
    if let Err(err) = init_logging(config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let store = open_store(&matches, &config)?;
    let engine = QueryEngine::new(&store);

    match matches.subcommand() {
        Some(("filter", args)) => run_filter(&engine, args),
        Some(("group", args)) => run_group(&engine, args),
        Some(("stats", args)) => run_stats(&engine, args),
        Some(("correlate", args)) => run_correlate(&engine, args),
        Some(("outliers", args)) => run_outliers(&engine, args, &config),
        Some(("pivot", args)) => run_pivot(&engine, args),
        Some(("sort", args)) => run_sort(&engine, args),
        Some(("report", _)) => run_report(&engine, &config),
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn open_store(matches: &ArgMatches, config: &Config) -> anyhow::Result<RecordStore> {
    let path = matches
        .value_of("dataset")
        .map(str::to_string)
        .or_else(|| config.dataset.path.clone());

    match path {
        Some(path) => load_store(&path).with_context(|| format!("loading dataset {}", path)),
        None => {
            info!("No dataset given, using the built-in sample");
            Ok(RecordStore::sample()?)
        }
    }
}

fn required<'m>(args: &'m ArgMatches, name: &str) -> anyhow::Result<&'m str> {
    match args.value_of(name) {
        Some(value) => Ok(value),
        None => bail!("missing --{}", name),
    }
}

fn run_filter(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let field = required(args, "field")?;
    let operator: ComparisonOperator = required(args, "op")?.parse()?;
    let data_type = resolve_field::<Student>(field)?.data_type();
    let literal = Value::parse_as(required(args, "value")?, data_type);

    for student in engine.filter(field, operator, literal)? {
        println!("{:>3}  {:<16} {:<18} {:.2}", student.id, student.name, student.major, student.gpa);
    }
    Ok(())
}

fn run_group(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let group_by = required(args, "by")?
        .split(',')
        .map(|f| f.trim().to_string())
        .collect();

    let aggregations = args
        .values_of("agg")
        .into_iter()
        .flatten()
        .map(|arg| match arg.split_once(':') {
            Some((function, field)) => Ok(Aggregation {
                function: function.to_string(),
                field: field.to_string(),
            }),
            None => bail!("aggregation '{}' is not FUNCTION:FIELD", arg),
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let table = engine.handle_aggregate(&AggregateRequest {
        group_by,
        aggregations,
    })?;

    if args.is_present("csv") {
        report::write_aggregate_csv(&table, io::stdout())?;
    } else {
        print!("{}", report::format_aggregate_table(&table));
    }
    Ok(())
}

fn run_stats(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let field = required(args, "field")?;
    let values = engine.field_values(field)?;
    let summary = summarize(&values)?;
    println!("{}", report::format_summary(field, &summary));

    if let Some(rank) = args.value_of("rank") {
        let value: f64 = rank.parse().with_context(|| format!("--rank {}", rank))?;
        println!(
            "percentile rank of {}: {:.2}",
            value,
            percentile_rank(&values, value)?
        );
    }
    Ok(())
}

fn run_correlate(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let request = CorrelationRequest {
        x: required(args, "x")?.to_string(),
        y: required(args, "y")?.to_string(),
    };
    let r = engine.handle_correlation(&request)?;
    println!("correlation({}, {}) = {:.4}", request.x, request.y, r);
    Ok(())
}

fn run_outliers(engine: &QueryEngine, args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let field = required(args, "field")?;
    let threshold = match args.value_of("threshold") {
        Some(t) => t.parse().with_context(|| format!("--threshold {}", t))?,
        None => config.analysis.outlier_threshold,
    };

    let outliers = engine.outliers(field, threshold)?;
    if outliers.is_empty() {
        println!("no {} values beyond |z| > {}", field, threshold);
    }
    for value in outliers {
        println!("{}", value);
    }
    Ok(())
}

fn run_pivot(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let table = engine.handle_pivot(&PivotRequest {
        row_field: "major".to_string(),
        column_field: "grade".to_string(),
    })?;

    match args.value_of("format") {
        Some("csv") => report::write_pivot_csv(&table, io::stdout())?,
        _ => print!(
            "{}",
            report::format_pivot(&table, RangeBuckets::grade_ranges().labels())
        ),
    }
    Ok(())
}

fn run_sort(engine: &QueryEngine, args: &ArgMatches) -> anyhow::Result<()> {
    let field = required(args, "field")?;
    let order = if args.is_present("desc") {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    for student in engine.sort_by(field, order)? {
        let value = student.get_field(field).map(|v| v.to_string()).unwrap_or_default();
        println!("{:<16} {}", student.name, value);
    }
    Ok(())
}

fn run_report(engine: &QueryEngine, config: &Config) -> anyhow::Result<()> {
    let analysis = &config.analysis;

    println!("=== Students with GPA > {} ===", analysis.high_gpa_threshold);
    let honors = engine.filter(
        "gpa",
        ComparisonOperator::GreaterThan,
        Value::Float(analysis.high_gpa_threshold),
    )?;
    for student in honors {
        println!("{}: {:.2}", student.name, student.gpa);
    }

    println!("\n=== Students aged {}-{} ===", analysis.min_age, analysis.max_age);
    for student in engine.filter_by_age_range(analysis.min_age, analysis.max_age) {
        println!("{}, age {}", student.name, student.age);
    }

    println!("\n=== Average GPA by major ===");
    for (major, gpa) in engine.average_gpa_by_major()? {
        println!("{}: {:.2}", major, gpa);
    }

    println!("\n=== Programming courses ===");
    for name in engine.course_names_containing("Programming")? {
        println!("{}", name);
    }

    println!("\n=== GPA statistics ===");
    match engine.summarize_field("gpa") {
        Ok(summary) => println!("{}", report::format_summary("gpa", &summary)),
        Err(ProcessingError::EmptyInput(_)) => println!("no data"),
        Err(err) => return Err(err.into()),
    }

    match engine.handle_correlation(&CorrelationRequest {
        x: "age".to_string(),
        y: "gpa".to_string(),
    }) {
        Ok(r) => println!("correlation(age, gpa) = {:.2}", r),
        Err(err) => warn!("correlation unavailable: {}", err),
    }

    println!("\n=== Grades by major and range ===");
    let pivot = engine.grade_distribution_by_major()?;
    print!(
        "{}",
        report::format_pivot(&pivot, RangeBuckets::grade_ranges().labels())
    );

    println!("\n=== Grade reports ===");
    for student in engine.store() {
        println!("{}", report::grade_report(student));
    }

    Ok(())
}

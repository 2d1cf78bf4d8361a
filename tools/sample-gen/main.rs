use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use workflo_gen::import::{END_STEP_INDEX, StepKind};

/// A CLI tool to generate random step tables for workflo-cli
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated CSV file to
    #[arg(short, long, default_value = "generated_steps.csv")]
    output: String,

    /// The minimum number of steps in each level
    #[arg(long, default_value_t = 2)]
    min: usize,

    /// The maximum number of steps in each level
    #[arg(long, default_value_t = 10)]
    max: usize,

    /// How deep groups may nest
    #[arg(long, default_value_t = 2)]
    depth: usize,
}

const HEADER: [&str; 10] = [
    "StepId",
    "StepIndex",
    "StepTitle",
    "StepDescription",
    "StepTag",
    "StepType",
    "DecisionPaths",
    "SelectionOptions",
    "Config",
    "Parent",
];

const LEAF_KINDS: [StepKind; 9] = [
    StepKind::Instruction,
    StepKind::Text,
    StepKind::Numeric,
    StepKind::Photo,
    StepKind::Video,
    StepKind::Signature,
    StepKind::Barcode,
    StepKind::Selection,
    StepKind::DateTime,
];

const COLOURS: [&str; 6] = ["Red", "Green", "Blue", "Amber", "Black", "White"];

#[derive(Debug, Default)]
struct Row {
    index: i64,
    parent: Option<i64>,
    kind: StepKind,
    title: String,
    tag: String,
    paths: String,
    options: String,
    config: String,
}

impl Row {
    fn record(&self) -> [String; 10] {
        [
            String::new(),
            self.index.to_string(),
            self.title.clone(),
            format!("Generated {} step", self.kind),
            self.tag.clone(),
            self.kind.to_string(),
            self.paths.clone(),
            self.options.clone(),
            self.config.clone(),
            self.parent.map(|p| p.to_string()).unwrap_or_default(),
        ]
    }
}

struct Generator {
    rng: ThreadRng,
    min: usize,
    max: usize,
    next_index: i64,
    rows: Vec<Row>,
}

impl Generator {
    /// Fills one level. Groups recurse until `depth_left` runs out.
    fn generate_level(&mut self, parent: Option<i64>, depth_left: usize) {
        let count = self.rng.random_range(self.min..=self.max);
        let indexes: Vec<i64> = (0..count)
            .map(|_| {
                self.next_index += 1;
                self.next_index
            })
            .collect();

        for (pos, &index) in indexes.iter().enumerate() {
            let roll = self.rng.random_range(0..10);
            let kind = if roll == 0 && depth_left > 0 {
                StepKind::Group
            } else if roll == 1 {
                StepKind::Decision
            } else {
                LEAF_KINDS[self.rng.random_range(0..LEAF_KINDS.len())]
            };

            let mut row = Row {
                index,
                parent,
                kind,
                title: format!("Step {}", index),
                ..Row::default()
            };
            if self.rng.random_bool(0.3) {
                row.tag = format!("tag-{}", self.rng.random_range(1..=5));
            }

            match kind {
                StepKind::Decision => {
                    // Only forward targets, so generated tables never loop.
                    let later = &indexes[pos + 1..];
                    let yes = if later.is_empty() {
                        END_STEP_INDEX
                    } else {
                        later[self.rng.random_range(0..later.len())]
                    };
                    row.paths = format!("Yes:{};No:{}", yes, END_STEP_INDEX);
                }
                StepKind::Selection => {
                    let take = self.rng.random_range(1..=COLOURS.len());
                    row.options = COLOURS[..take].join(";");
                    if self.rng.random_bool(0.5) {
                        row.config = "multi:true".to_string();
                    }
                }
                StepKind::Group => {
                    self.rows.push(row);
                    self.generate_level(Some(index), depth_left - 1);
                    continue;
                }
                _ => {
                    if self.rng.random_bool(0.2) {
                        row.config = "optional:yes".to_string();
                    }
                }
            }
            self.rows.push(row);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating a step table (steps per level: {} to {}, group depth {})...",
        cli.min, cli.max, cli.depth
    );

    let mut generator = Generator {
        rng: rand::rng(),
        min: cli.min,
        max: cli.max,
        next_index: 0,
        rows: Vec::new(),
    };
    generator.generate_level(None, cli.depth);

    let mut writer = csv::Writer::from_path(&cli.output)?;
    writer.write_record(HEADER)?;
    for row in &generator.rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;

    println!(
        "Successfully generated {} step(s) and saved them to '{}'",
        generator.rows.len(),
        cli.output
    );

    Ok(())
}

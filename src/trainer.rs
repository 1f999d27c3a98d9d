use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use crate::drill::{Drill, DrillConfig, DrillState, DrillStatus, DrillSummary, Grade};
use crate::grid::RangeGrid;
use crate::range::{Action, ActionOrder};
use crate::scenario::{ChartBook, Scenario, resolve};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub hands: u32,
    pub seed: Option<u64>,
    #[serde(default)]
    pub scenario: Scenario,
    /// Chart book to load instead of the built-in charts.
    #[serde(default)]
    pub chart: Option<PathBuf>,
    #[serde(default)]
    pub action_order: ActionOrder,
    #[serde(default)]
    pub no_color: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            hands: 10,
            seed: None,
            scenario: Scenario::default(),
            chart: None,
            action_order: ActionOrder::default(),
            no_color: false,
        }
    }
}

impl TrainerConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading trainer config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing trainer config {}", path.display()))
    }
}

pub struct Trainer {
    config: TrainerConfig,
    drill: Drill,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        let book = match &config.chart {
            Some(path) => ChartBook::from_path(path)?,
            None => ChartBook::builtin()?,
        };
        let table = resolve(&book, &config.scenario, &config.action_order)?;
        let drill = Drill::new(
            DrillConfig {
                hands: config.hands,
                seed: config.seed,
                scenario: config.scenario,
                order: config.action_order.clone(),
            },
            table,
        );
        Ok(Self { config, drill })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut input = String::new();

        loop {
            let snapshot = self.drill.snapshot();
            if snapshot.status == DrillStatus::Completed {
                self.print_summary(&snapshot.summary);
                break;
            }

            self.print_deal(&snapshot);

            loop {
                input.clear();
                print!(
                    "Select action [1-{}] (g=grid, h=help, q=quit): ",
                    snapshot.options.len()
                );
                io::stdout().flush()?;
                if io::stdin().read_line(&mut input)? == 0 {
                    self.print_summary(&snapshot.summary);
                    return Ok(());
                }
                let trimmed = input.trim().to_lowercase();

                match trimmed.as_str() {
                    "q" => {
                        self.print_summary(&snapshot.summary);
                        return Ok(());
                    }
                    "h" => {
                        self.print_help(&snapshot);
                        continue;
                    }
                    "g" => {
                        self.print_grid();
                        continue;
                    }
                    _ => {}
                }

                let len = snapshot.options.len();
                let chosen = match trimmed.parse::<usize>() {
                    Ok(index) if (1..=len).contains(&index) => Some(snapshot.options[index - 1]),
                    _ => trimmed.parse::<Action>().ok(),
                };
                match chosen.and_then(|action| self.drill.answer(action)) {
                    Some(grade) => {
                        self.print_grade(&grade);
                        break;
                    }
                    None => println!("Invalid selection. Try again or press 'h' for help."),
                }
            }
        }

        Ok(())
    }

    pub fn drill_state(&self) -> DrillState {
        self.drill.snapshot()
    }

    pub fn answer(&mut self, action: Action) -> Option<Grade> {
        self.drill.answer(action)
    }

    /// Answers every hand with the charted action.
    pub fn autoplay(&mut self) -> Result<DrillSummary> {
        while let Some(expected) = self.drill.expected() {
            self.drill.answer(expected);
        }
        Ok(self.drill.snapshot().summary)
    }

    fn print_deal(&self, snapshot: &DrillState) {
        let cards = snapshot.hero_cards.join(" ");
        let hand = snapshot.hand.map(|h| h.to_string()).unwrap_or_default();
        let options = snapshot
            .options
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                if self.config.no_color {
                    format!("{}. {}", idx + 1, action)
                } else {
                    format!("{}. {}", idx + 1, action.bold().green())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        if self.config.no_color {
            println!(
                "Hand {} | {} | Hero {} ({}) | Options: {}",
                snapshot.hand_index, snapshot.scenario, cards, hand, options
            );
        } else {
            println!(
                "{} {} {} {} {} ({}) {} {}",
                "Hand".bold().cyan(),
                snapshot.hand_index,
                snapshot.scenario.to_string().blue(),
                "Hero".bold().white(),
                cards.bold().yellow(),
                hand,
                "Options".bold().yellow(),
                options
            );
        }
    }

    fn print_grade(&self, grade: &Grade) {
        let verdict = if grade.correct { "Correct" } else { "Mistake" };
        if self.config.no_color || grade.correct {
            println!(
                "{verdict}: {} is a {} (you chose {})",
                grade.hand, grade.expected, grade.chosen
            );
        } else {
            println!(
                "{}: {} is a {} (you chose {})",
                verdict.bold().red(),
                grade.hand,
                grade.expected.bold().green(),
                grade.chosen
            );
        }
    }

    pub fn print_grid(&self) {
        let grid = RangeGrid::from_table(self.drill.table());
        for row in &grid.rows {
            let line = row
                .iter()
                .map(|cell| {
                    let text = format!("{:<4}", cell.label.to_string());
                    match (self.config.no_color, cell.action) {
                        (true, Action::Fold) => "·   ".to_string(),
                        (true, _) => text,
                        (false, Action::Fold) => text.dimmed().to_string(),
                        (false, Action::Call) => text.green().to_string(),
                        (false, Action::Raise) => text.yellow().to_string(),
                        (false, Action::ThreeBet) => text.red().to_string(),
                        (false, Action::AllIn) => text.magenta().to_string(),
                    }
                })
                .collect::<String>();
            println!("{line}");
        }
        for share in grid.breakdown() {
            println!(
                "{:>7}: {:>3} hands, {:>4} combos ({:.1}%)",
                share.action,
                share.hands,
                share.combos,
                share.combo_share * 100.0
            );
        }
    }

    pub fn print_summary(&self, summary: &DrillSummary) {
        if self.config.no_color {
            println!(
                "Summary: hands={}, correct={}, accuracy={:.1}%",
                summary.hands_played,
                summary.correct,
                summary.accuracy() * 100.0
            );
        } else {
            println!(
                "{} {} {} {} {} {:.1}%",
                "Summary".bold().magenta(),
                summary.hands_played,
                "Correct".bold().white(),
                summary.correct,
                "Accuracy".bold().white(),
                summary.accuracy() * 100.0
            );
        }
        for mistake in &summary.mistakes {
            println!(
                "  {}: chose {}, chart says {}",
                mistake.hand, mistake.chosen, mistake.expected
            );
        }
    }

    fn print_help(&self, snapshot: &DrillState) {
        println!("Available actions for hand {}:", snapshot.hand_index);
        for (idx, action) in snapshot.options.iter().enumerate() {
            println!("  {}. {}", idx + 1, action);
        }
        println!(
            "Type the number or name of your choice, 'g' to view the chart, 'h' for help, or 'q' to quit."
        );
    }
}

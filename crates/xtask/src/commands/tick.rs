//! Tick a generated tree command
//!
//! Builds one of the synthetic shapes and ticks it frame by frame, printing
//! the root status and the work done by the leaves on every frame.

use anyhow::{Context, Result};
use behavior_tree::{BehaviorTree, Status, TreeConfig};
use clap::Parser;
use console::style;

use crate::shapes::{Frame, LeafPlan, Shape};

/// Build a synthetic tree and tick it for a number of frames
#[derive(Parser, Debug)]
pub struct Tick {
    /// Tree shape to generate
    #[arg(long, value_enum, default_value = "horizontal")]
    pub shape: Shape,

    /// Shape size (children per composite, or levels for `deep`)
    #[arg(short = 's', long, default_value = "64")]
    pub size: usize,

    /// Number of ticks to run
    #[arg(short = 'n', long, default_value = "10")]
    pub frames: u64,

    /// Every n-th leaf fails (0 disables failures)
    #[arg(long, default_value = "0")]
    pub fail_every: usize,

    /// Every n-th leaf stays running for `--run-ticks` ticks (0 disables)
    #[arg(long, default_value = "0")]
    pub slow_every: usize,

    /// Ticks a slow leaf stays running
    #[arg(long, default_value = "2")]
    pub run_ticks: u32,

    /// Size the arena from the environment (`BT_ARENA_CAPACITY`) instead of
    /// from the shape
    #[arg(long)]
    pub env_config: bool,
}

impl Tick {
    pub fn execute(self) -> Result<()> {
        let config = if self.env_config {
            TreeConfig::from_env()
        } else {
            self.shape.config(self.size)
        };
        let plan = LeafPlan {
            fail_every: self.fail_every,
            slow_every: self.slow_every,
            run_ticks: self.run_ticks,
        };

        let mut tree = BehaviorTree::new(config.clone());
        let root = self
            .shape
            .build(&mut tree, self.size, plan)
            .with_context(|| {
                format!(
                    "Failed to build {:?} tree of size {} into a {} byte arena",
                    self.shape, self.size, config.arena_capacity
                )
            })?;

        println!("{}", style("🌳 Behavior tree").green().bold());
        println!("  Shape:  {:?} (size {})", self.shape, self.size);
        println!("  Nodes:  {}", style(tree.len()).cyan());
        println!(
            "  Arena:  {} / {} bytes",
            style(tree.arena().used()).cyan(),
            tree.arena().capacity()
        );
        println!("  Root:   {}", root);
        println!();

        let mut frame = Frame::default();
        for _ in 0..self.frames {
            let before = frame.updates;
            let status = tree.tick(&mut frame);
            tracing::info!(tick = tree.tick_count(), %status, "frame");

            println!(
                "  tick {:>4}  {}  {} leaf updates, cursor {}",
                tree.tick_count(),
                styled(status),
                frame.updates - before,
                tree.cursor_of(root)
            );
        }

        println!();
        println!(
            "  {} updates, {} running reports, {} completions",
            style(frame.updates).cyan(),
            style(frame.running).yellow(),
            style(frame.completed).green()
        );
        Ok(())
    }
}

fn styled(status: Status) -> console::StyledObject<String> {
    let text = status.to_string();
    match status {
        Status::Success => style(text).green(),
        Status::Failure => style(text).red(),
        Status::Running => style(text).yellow(),
        Status::Invalid => style(text).dim(),
    }
}

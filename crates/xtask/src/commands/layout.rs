//! Arena layout report command
//!
//! Shows how much arena space a synthetic shape needs and whether it fits
//! the capacity configured through the environment.

use anyhow::Result;
use behavior_tree::{BehaviorTree, TreeConfig};
use clap::Parser;
use console::style;

use crate::shapes::{Frame, LeafPlan, Shape};

/// Report arena usage of a tree shape
#[derive(Parser, Debug)]
pub struct Layout {
    /// Tree shape to measure
    #[arg(long, value_enum, default_value = "horizontal")]
    pub shape: Shape,

    /// Shape sizes to measure
    #[arg(short = 's', long, value_delimiter = ',', default_value = "8,16,32,64")]
    pub sizes: Vec<usize>,
}

impl Layout {
    pub fn execute(self) -> Result<()> {
        let configured = TreeConfig::from_env();
        let plan = LeafPlan {
            fail_every: 0,
            slow_every: 0,
            run_ticks: 0,
        };

        println!("{}", style("📐 Arena layout").green().bold());
        println!(
            "  Configured capacity: {} bytes {}",
            style(configured.arena_capacity).cyan(),
            style("(BT_ARENA_CAPACITY)").dim()
        );
        println!();
        println!(
            "  {:>6} {:>8} {:>8} {:>10} {:>10}  fits",
            "size", "nodes", "edges", "used", "bytes/node"
        );

        for &size in &self.sizes {
            let (nodes, edges) = self.shape.counts(size);
            let mut tree = BehaviorTree::<Frame>::new(self.shape.config(size));
            if let Err(err) = self.shape.build(&mut tree, size, plan) {
                println!("  {:>6} {}", size, style(err).red());
                continue;
            }

            let used = tree.arena().used();
            let fits = if used <= configured.arena_capacity {
                style("yes").green()
            } else {
                style("no").red()
            };
            println!(
                "  {:>6} {:>8} {:>8} {:>10} {:>10.1}  {}",
                size,
                nodes,
                edges,
                used,
                used as f64 / nodes.max(1) as f64,
                fits
            );
        }

        Ok(())
    }
}

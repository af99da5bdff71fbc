//! Single-source shortest paths from a whitespace-separated graph description.
//!
//! Input: the vertex count and edge count, then one `from to weight` triple
//! per edge, then the source vertex. Output: the distance to every vertex on
//! one line, `-1` for vertices the source cannot reach.
//!
//! ```text
//! $ echo "4 5  0 1 4  0 2 1  2 1 2  1 3 1  2 3 5  0" | sssp --quiet
//! 0 3 1 4
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use fib_sssp::shortest_path::{shortest_distances, Graph};
use log::info;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sssp",
    version,
    about = "Shortest distances from one vertex, using a Fibonacci heap"
)]
struct Cli {
    /// Graph description to read (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Source vertex, overriding the one given at the end of the input
    #[arg(short, long)]
    source: Option<usize>,

    /// Do not print the input prompt when reading from stdin
    #[arg(short, long)]
    quiet: bool,
}

/// A parsed graph plus the source vertex named in the input
#[derive(Debug)]
struct Problem {
    graph: Graph<i64>,
    source: usize,
}

fn parse_problem(text: &str) -> Result<Problem> {
    let mut tokens = text.split_whitespace();
    let mut next = |what: &str| -> Result<&str> {
        tokens
            .next()
            .with_context(|| format!("input ended before the {what}"))
    };

    let vertices: usize = next("vertex count")?
        .parse()
        .context("vertex count is not a non-negative integer")?;
    let edges: usize = next("edge count")?
        .parse()
        .context("edge count is not a non-negative integer")?;

    let mut graph = Graph::try_new(vertices).context("vertex count is too large")?;
    for i in 0..edges {
        let from: usize = next("edge source")?
            .parse()
            .with_context(|| format!("edge {i}: bad source vertex"))?;
        let to: usize = next("edge target")?
            .parse()
            .with_context(|| format!("edge {i}: bad target vertex"))?;
        let weight: i64 = next("edge weight")?
            .parse()
            .with_context(|| format!("edge {i}: bad weight"))?;
        graph
            .add_edge(from, to, weight)
            .with_context(|| format!("edge {i}"))?;
    }

    let source: usize = next("source vertex")?
        .parse()
        .context("source vertex is not a non-negative integer")?;
    if tokens.next().is_some() {
        bail!("unexpected trailing input after the source vertex");
    }

    Ok(Problem { graph, source })
}

fn format_distances(distances: &[Option<i64>]) -> String {
    distances
        .iter()
        .map(|d| d.unwrap_or(-1).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            if !cli.quiet {
                eprintln!(
                    "Please input the number of vertices and edges, then one \
                     `from to weight` line per edge, and finally the source vertex"
                );
            }
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    let problem = parse_problem(&text)?;
    let source = cli.source.unwrap_or(problem.source);
    info!(
        "graph with {} vertices and {} edges, source {source}",
        problem.graph.vertex_count(),
        problem.graph.edge_count()
    );

    let distances = shortest_distances(&problem.graph, source)?;
    println!("{}", format_distances(&distances));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_solve() {
        let problem = parse_problem("4 5\n0 1 4\n0 2 1\n2 1 2\n1 3 1\n2 3 5\n0\n").unwrap();
        assert_eq!(problem.source, 0);
        assert_eq!(problem.graph.edge_count(), 5);

        let distances = shortest_distances(&problem.graph, problem.source).unwrap();
        assert_eq!(format_distances(&distances), "0 3 1 4");
    }

    #[test]
    fn test_unreachable_prints_minus_one() {
        let problem = parse_problem("3 1 1 2 7 1").unwrap();
        let distances = shortest_distances(&problem.graph, problem.source).unwrap();
        assert_eq!(format_distances(&distances), "-1 0 7");
    }

    #[test]
    fn test_truncated_input() {
        let err = parse_problem("3 2 0 1 5").unwrap_err();
        assert!(err.to_string().contains("edge source"), "{err:#}");
    }

    #[test]
    fn test_huge_vertex_count_is_an_error() {
        let err = parse_problem("18446744073709551615 0 0").unwrap_err();
        assert!(format!("{err:#}").contains("vertex count is too large"), "{err:#}");

        let err = parse_problem(&format!("{} 0 0", usize::MAX / 4)).unwrap_err();
        assert!(format!("{err:#}").contains("cannot allocate"), "{err:#}");
    }

    #[test]
    fn test_bad_edge_rejected() {
        let err = parse_problem("2 1 0 5 1 0").unwrap_err();
        assert!(format!("{err:#}").contains("out of range"), "{err:#}");

        let err = parse_problem("2 1 0 1 -3 0").unwrap_err();
        assert!(format!("{err:#}").contains("negative weight"), "{err:#}");
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(parse_problem("1 0 0 extra").is_err());
    }
}

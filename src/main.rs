use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use termprove::cnf::dimacs::{parse_dimacs_str, to_dimacs};
use termprove::cnf::extract::cnf_to_formula;
use termprove::cnf::gen::gen_planted_ksat;
use termprove::search::driver::prove;
use termprove::search::preprocess::{preprocess, PreprocessClass};
use termprove::search::satprove::sat_prove_front;
use termprove::search::{Params, ProveReport, StopFlag};
use termprove::solver::sat_backend::SatProveBackend;
use termprove::solver::varisat::VarisatSolver;
use termprove::solver::{IncrementalSolver, SolveResult};
use termprove::term::parse::parse_formula;
use termprove::term::store::TermStore;
use termprove::theory::boolean::BoolTheory;

#[derive(Parser, Debug)]
#[command(name = "termprove")]
#[command(about = "Case-splitting decision procedure over hash-consed terms")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Tunables {
    #[arg(long, default_value_t = 100.0)]
    initial_conflict_limit: f64,
    #[arg(long, default_value_t = 1.5)]
    conflict_factor: f64,
    #[arg(long, default_value_t = 1.05)]
    bump_decay: f64,
    #[arg(long, default_value_t = 0.02)]
    random_probability: f64,
    #[arg(long, default_value_t = 2)]
    score_mode: u8,
    #[arg(long, default_value_t = 2)]
    do_learn: u32,
    #[arg(long)]
    no_unate: bool,
    #[arg(long)]
    first_fail: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 0)]
    max_steps: u64,
}

impl Tunables {
    fn to_params(&self) -> Result<Params> {
        if self.conflict_factor <= 1.0 {
            bail!(
                "conflict_factor must exceed 1, got {}",
                self.conflict_factor
            );
        }
        if self.score_mode > 2 {
            bail!("score_mode must be 0..=2, got {}", self.score_mode);
        }
        Ok(Params {
            initial_conflict_limit: self.initial_conflict_limit,
            conflict_factor: self.conflict_factor,
            bump_decay: self.bump_decay,
            random_probability: self.random_probability,
            score_mode: self.score_mode,
            do_learn: self.do_learn,
            do_unate: !self.no_unate,
            find_all_fails: !self.first_fail,
            seed: self.seed,
            max_steps: self.max_steps,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    Prove {
        expr: String,
        #[command(flatten)]
        tunables: Tunables,
    },
    Sat {
        #[arg(long)]
        cnf: String,
        #[arg(long, default_value = "sat_prove")]
        backend: String,
        #[command(flatten)]
        tunables: Tunables,
    },
    Preprocess {
        expr: String,
        #[command(flatten)]
        tunables: Tunables,
    },
    GenRandom {
        #[arg(long)]
        vars: usize,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        width: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        cnf_out: String,
        #[arg(long)]
        make_unsat: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Prove { expr, tunables } => {
            let params = tunables.to_params()?;
            let mut store = TermStore::new();
            let formula = parse_formula(&mut store, &expr)
                .with_context(|| format!("failed to parse '{}'", expr))?;
            let mut theory = BoolTheory::new();
            let report = prove(&mut store, &mut theory, formula, params, StopFlag::new());
            print_report("PROVE", &store, &report);
        }
        Commands::Sat {
            cnf,
            backend,
            tunables,
        } => {
            let params = tunables.to_params()?;
            let text = std::fs::read_to_string(&cnf)
                .with_context(|| format!("failed to read {}", cnf))?;
            let instance = parse_dimacs_str(&text)?;
            match backend.as_str() {
                "sat_prove" => {
                    let mut store = TermStore::new();
                    let (formula, _) = cnf_to_formula(&mut store, &instance);
                    let mut theory = BoolTheory::new();
                    let report =
                        sat_prove_front(&mut store, &mut theory, formula, params, StopFlag::new());
                    let verdict = if report.fails.is_empty() { "UNSAT" } else { "SAT" };
                    println!(
                        "SAT {}: {} | decisions={} conflicts={} restarts={} learned={}",
                        cnf,
                        verdict,
                        report.stats.decisions,
                        report.stats.conflicts,
                        report.stats.restarts,
                        report.stats.learned_rules
                    );
                }
                "varisat" | "internal" => {
                    let mut solver: Box<dyn IncrementalSolver> = if backend == "varisat" {
                        Box::new(VarisatSolver::new())
                    } else {
                        Box::new(SatProveBackend::with_params(params))
                    };
                    for _ in 0..instance.num_vars {
                        solver.new_var();
                    }
                    for clause in &instance.clauses {
                        solver.add_clause(clause.clone());
                    }
                    let verdict = match solver.solve(&[]) {
                        SolveResult::Sat => "SAT",
                        SolveResult::Unsat => "UNSAT",
                    };
                    println!("SAT {}: {} (backend={})", cnf, verdict, solver.backend_name());
                }
                other => bail!("unknown backend '{}'", other),
            }
        }
        Commands::Preprocess { expr, tunables } => {
            let params = tunables.to_params()?;
            let mut store = TermStore::new();
            let formula = parse_formula(&mut store, &expr)
                .with_context(|| format!("failed to parse '{}'", expr))?;
            let mut theory = BoolTheory::new();
            let pre = preprocess(&mut store, &mut theory, formula, &params);
            let class = match pre.class {
                PreprocessClass::Default => "DEFAULT",
                PreprocessClass::Cnf => "CNF",
                PreprocessClass::Unsat => "UNSAT",
                PreprocessClass::Norun => "NORUN",
            };
            println!(
                "PREPROCESS: class={} | seeded={} | residual={}",
                class,
                pre.trail.len(),
                store.display(pre.residual)
            );
        }
        Commands::GenRandom {
            vars,
            clauses,
            width,
            seed,
            cnf_out,
            make_unsat,
        } => {
            let (instance, _witness) = gen_planted_ksat(vars, clauses, width, seed, make_unsat)?;
            std::fs::write(&cnf_out, to_dimacs(&instance))
                .with_context(|| format!("failed to write {}", cnf_out))?;
            println!(
                "GEN: wrote {} | vars={} clauses={} width={} unsat={}",
                cnf_out,
                vars,
                instance.clauses.len(),
                width,
                make_unsat
            );
        }
    }
    Ok(())
}

fn print_report(tag: &str, store: &TermStore, report: &ProveReport) {
    let verdict = if report.interrupted {
        "INTERRUPTED"
    } else if report.fails.is_empty() {
        "PROVED"
    } else {
        "FAILED"
    };
    println!(
        "{} {}: fails={} decisions={} propagations={} conflicts={} restarts={}",
        tag,
        verdict,
        report.fails.len(),
        report.stats.decisions,
        report.stats.propagations,
        report.stats.conflicts,
        report.stats.restarts
    );
    for (idx, fail) in report.fails.iter().enumerate() {
        let assumed = fail
            .trail
            .iter()
            .map(|e| {
                let name = store.display(e.lit.term);
                if e.lit.sign { name } else { format!("!{}", name) }
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "FAIL {}: residual={} | trail=[{}]",
            idx,
            store.display(fail.residual),
            assumed
        );
    }
}

extern crate clap;

use clap::{App, Arg};
use xsolve::{
    fallback_words, parse_word_list, Direction, Grid, SolveOutcome, Solver, WordIndex,
};

fn main() -> Result<(), String> {
    env_logger::init();

    let matches = App::new("xsolve")
        .arg(
            Arg::with_name("grid")
                .short("g")
                .long("grid")
                .value_name("FILE")
                .help("Grid layout: one row per line, # for blocked cells, . for open cells, letters for pre-filled cells")
                .required(true),
        )
        .arg(
            Arg::with_name("words")
                .short("w")
                .long("words")
                .value_name("FILE")
                .help("Word list, one word per line. A small built-in list is used if omitted"),
        )
        .get_matches();

    let grid_path = matches.value_of("grid").expect("grid not included");
    let grid_input =
        std::fs::read_to_string(grid_path).map_err(|e| format!("failed to read grid: {}", e))?;
    let mut grid = Grid::parse(&grid_input).map_err(|e| e.to_string())?;

    let words = match matches.value_of("words") {
        Some(path) => {
            let input = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read word list: {}", e))?;
            parse_word_list(&input).map_err(|e| e.to_string())?
        }
        None => fallback_words(),
    };
    let index = WordIndex::build(words);

    let mut solver = Solver::prepare(&grid, &index);
    match solver.solve() {
        SolveOutcome::Solved(solution) => {
            solution.apply(&mut grid, solver.slots());
            println!("{}", grid);

            let mut entries: Vec<_> = solution
                .iter()
                .map(|(slot_id, word)| (&solver.slots()[slot_id], word))
                .collect();
            entries.sort_by_key(|(slot, _)| {
                (
                    match slot.direction {
                        Direction::Across => 0,
                        Direction::Down => 1,
                    },
                    slot.number,
                )
            });
            for (slot, word) in entries {
                println!("{}: {}", slot, word);
            }

            let report = solver.report();
            println!(
                "{} slots; arc consistency {:?}, search {:?}, {} recursive calls",
                report.slot_count, report.ac3_time, report.search_time, report.recursive_calls
            );
            Ok(())
        }
        SolveOutcome::NothingToSolve => Err(String::from("Grid has no slots to fill")),
        SolveOutcome::Unsolvable(reason) => Err(format!("No fill exists: {}", reason)),
        SolveOutcome::Cancelled => Err(String::from("Solve was cancelled")),
    }
}

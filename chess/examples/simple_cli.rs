// Simple command-line application to play chess
//
// Moves are entered in the oracle reply format: four digits `src_rank src_file dst_rank
// dst_file`, counted from zero and seen from the side to move. For example, `1434` is e2-e4 for
// White and e7-e5 for Black. Type `undo` to take back the last move.
//
// Run with `RUST_LOG=debug` to see the oracle requests.

use gridchess::{
    oracle::{AskError, Oracle},
    File, Rank, Session,
};
use std::io::{self, BufRead, Write};

struct Typed(String);

impl Oracle for Typed {
    type Err = io::Error;

    fn select(&mut self, _request: &str) -> Result<String, io::Error> {
        Ok(std::mem::take(&mut self.0))
    }
}

fn print_grid(session: &Session) {
    let b = session.board();
    for rank in Rank::iter().rev() {
        print!("{} ", rank);
        for file in File::iter() {
            print!("{}", b.get2(file, rank));
        }
        println!();
    }
    print!("  ");
    for file in File::iter() {
        print!("{}", file);
    }
    println!();
}

fn main() {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let mut session = Session::new_initial();

    loop {
        print_grid(&session);
        if session.legal_moves().is_empty() {
            if session.is_check() {
                println!("Checkmate, {:?} wins", session.side().opponent());
            } else {
                println!("Stalemate");
            }
            break;
        }
        if session.is_check() {
            println!("Check!");
        }

        print!("{:?} move #{}: ", session.side(), session.len() + 1);
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        if s == "undo" {
            match session.pop() {
                Some(mv) => println!("Took back {}", mv),
                None => println!("Nothing to undo"),
            }
            println!();
            continue;
        }

        match session.ask(&mut Typed(s.to_string())) {
            Ok(mv) => println!("Played {}", mv),
            Err(AskError::Oracle(e)) => {
                println!("Input error: {}", e);
                break;
            }
            Err(e) => println!("Bad move: {}", e),
        }
        println!();
    }
}

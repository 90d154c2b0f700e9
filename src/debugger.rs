//! Interactive single-step debugger. Grounded in
//! `examples/original_source/debug.c`'s `debug_ask`: prompt, read one line,
//! the first character picks the command, anything other than `s`/⏎/`c`
//! re-prompts within the same step.
//!
//! Takes the machine through the same `&Machine` reference tests use (no
//! globals), so property tests could drive it with an in-memory reader if
//! needed later.

pub mod disassemble;

use crate::inspect::{print_cpu, print_data, print_program};
use crate::machine::Machine;
use std::io::{self, BufRead, Write};

/// What the simulation loop should do after consulting the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    /// Execute one more instruction, then ask again.
    Step,
    /// Leave debug mode for the remainder of the program.
    Continue,
}

/// Reads commands from standard input until one of them is a step or a
/// continue. `r`/`d`/`t`/`p`/`m`/`h` print a view and loop back to the
/// prompt; anything else is silently ignored.
pub fn debug_ask(machine: &Machine) -> DebugCommand {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("debug? ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => return DebugCommand::Continue,
        };

        match line.chars().next() {
            None => return DebugCommand::Step,
            Some('s') => return DebugCommand::Step,
            Some('c') => return DebugCommand::Continue,
            Some('h') => print_help(),
            Some('r') => print_cpu(machine),
            Some('d') => print_data(machine),
            Some('t') | Some('p') => print_program(machine),
            Some('m') => {
                print_cpu(machine);
                print_data(machine);
            }
            Some(_) => {}
        }
    }
}

fn print_help() {
    println!("h            print this help");
    println!("c            continue (leave debug mode for the rest of the run)");
    println!("s, <enter>   step: execute one instruction");
    println!("r            print CPU registers, PC and CC");
    println!("d            print the data segment");
    println!("t, p         print the text segment, disassembled");
    println!("m            print CPU then data");
}

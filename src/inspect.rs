//! Textual printers for CPU, data and text segments. No side effects besides
//! writing to standard output. Grounded in
//! `examples/original_source/machine.c`'s `print_cpu`/`print_data`/
//! `print_program`.

use crate::debugger::disassemble::disassemble;
use crate::machine::Machine;

pub fn print_cpu(machine: &Machine) {
    println!("\n*** CPU ***");
    println!("PC: {:#010x}   CC: {}", machine.pc, machine.cc.symbol());
    for (i, value) in machine.registers.iter().enumerate() {
        if i % 3 == 0 {
            println!();
        }
        print!("R{:02}: {:#010x} {:<12}", i, *value as u32, value);
    }
    println!();
}

pub fn print_data(machine: &Machine) {
    println!(
        "\n*** DATA (size {}, end = {:#010x} ({})) ***",
        machine.datasize(),
        machine.dataend,
        machine.dataend
    );
    for (i, value) in machine.data.iter().enumerate() {
        if i % 3 == 0 {
            println!();
        }
        print!("{:#06x}: {:#010x} {:<12}", i, value, value);
    }
    println!();
}

pub fn print_program(machine: &Machine) {
    println!("\n*** PROGRAM (size: {}) ***", machine.textsize());
    for (i, word) in machine.text.iter().enumerate() {
        println!("{:#06x}: {:#010x}\t{}", i, word, disassemble(*word));
    }
    println!();
}

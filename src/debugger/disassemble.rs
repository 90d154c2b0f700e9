//! Renders a raw instruction word as assembly text. Used by the simulation
//! loop's trace line, the debugger's `t`/`p`/`m` commands, and
//! `inspect::print_program`.
//!
//! Grounded in `examples/original_source/instruction.c`'s `print_instruction`
//! / `print_two` / `print_onenimm`, with the same per-opcode operand
//! rendering rules: two-register-like ops print `Rn, operand`, branch-shaped
//! ops print `COND, operand`, PUSH/POP print a bare operand.

use crate::instruction::{condition_name, decode_fields, mnemonic, Instruction, Operand};

pub fn disassemble(word: u32) -> String {
    let instr = decode_fields(word);
    let name = mnemonic(&instr);

    match instr {
        Instruction::Illop
        | Instruction::Nop
        | Instruction::Ret
        | Instruction::Halt
        | Instruction::Unknown(_) => name.to_string(),

        Instruction::Load { reg, operand } | Instruction::Add { reg, operand } | Instruction::Sub { reg, operand } => {
            format!("{} R{:02}, {}", name, reg, render_operand(&operand))
        }

        Instruction::Store { reg, operand } => {
            format!("{} R{:02}, {}", name, reg, render_operand(&operand))
        }

        Instruction::Branch { cond, operand } | Instruction::Call { cond, operand } => {
            format!("{} {}, {}", name, condition_name(cond), render_operand(&operand))
        }

        Instruction::Push { operand } | Instruction::Pop { operand } => {
            format!("{} {}", name, render_operand(&operand))
        }
    }
}

fn render_operand(operand: &Operand) -> String {
    match *operand {
        Operand::Immediate(value) => format!("#{}", value),
        Operand::Absolute(address) => format!("@{:#06x}", address),
        Operand::Indexed { rindex, offset } => format!("{}[R{:02}]", offset, rindex),
    }
}

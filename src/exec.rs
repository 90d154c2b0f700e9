//! Opcode dispatch: the effect of one already-decoded instruction on a
//! `Machine`. Grounded in `examples/original_source/exec.c`'s
//! `decode_execute`/`load`/`store`/`add`/`sub`/`branch`/`call`/`ret`/`push`/
//! `pop` family, one function each there, folded into a single `match` here
//! (an exhaustive match beats a function-pointer table for a closed set of
//! opcodes).
//!
//! REDESIGN: the C source calls `error()`, which prints and calls `exit()`,
//! from arbitrary depth. Here every fallible step returns
//! `Result<_, VmError>` and `decode_execute` propagates with `?`; only the
//! CLI turns an `Err` into a process exit.

use crate::error::{ErrorKind, VmError};
use crate::instruction::{effective_address, Instruction, Operand};
use crate::machine::Machine;

/// What the simulation loop should do after this instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Halt,
}

/// Executes one instruction against `machine`, whose `pc` already names the
/// *next* instruction (the simulation loop pre-increments before calling
/// this). That pre-advanced `pc` is what gets tagged onto any error, and
/// what `CALL` pushes as the return address.
pub fn decode_execute(machine: &mut Machine, instr: Instruction) -> Result<ControlFlow, VmError> {
    let addr = machine.pc;

    match instr {
        Instruction::Illop => Err(VmError::new(ErrorKind::Illegal, addr)),
        Instruction::Unknown(_) => Err(VmError::new(ErrorKind::Unknown, addr)),
        Instruction::Nop => Ok(ControlFlow::Continue),
        Instruction::Halt => Ok(ControlFlow::Halt),

        Instruction::Load { reg, operand } => {
            let value = resolve_operand(machine, operand, addr)?;
            machine.set_register(reg, value);
            machine.refresh_cc(reg);
            Ok(ControlFlow::Continue)
        }

        Instruction::Store { reg, operand } => {
            reject_immediate(&operand, addr)?;
            let address = effective_address(machine, &operand);
            check_data_addr(machine, address, addr)?;
            machine.data[address as usize] = machine.register(reg) as u32;
            Ok(ControlFlow::Continue)
        }

        Instruction::Add { reg, operand } => {
            let value = resolve_operand(machine, operand, addr)?;
            let result = machine.register(reg).wrapping_add(value);
            machine.set_register(reg, result);
            machine.refresh_cc(reg);
            Ok(ControlFlow::Continue)
        }

        Instruction::Sub { reg, operand } => {
            let value = resolve_operand(machine, operand, addr)?;
            let result = machine.register(reg).wrapping_sub(value);
            machine.set_register(reg, result);
            machine.refresh_cc(reg);
            Ok(ControlFlow::Continue)
        }

        Instruction::Branch { cond, operand } => {
            reject_immediate(&operand, addr)?;
            if branch_taken(cond, machine, addr)? {
                machine.pc = effective_address(machine, &operand);
            }
            Ok(ControlFlow::Continue)
        }

        Instruction::Call { cond, operand } => {
            reject_immediate(&operand, addr)?;
            if branch_taken(cond, machine, addr)? {
                push_word(machine, machine.pc, addr)?;
                machine.pc = effective_address(machine, &operand);
            }
            Ok(ControlFlow::Continue)
        }

        Instruction::Ret => {
            check_stack(machine, addr)?;
            machine.sp = machine.sp.wrapping_add(1);
            machine.pc = read_stack_slot(machine, addr)?;
            Ok(ControlFlow::Continue)
        }

        Instruction::Push { operand } => {
            check_stack(machine, addr)?;
            let value = resolve_operand(machine, operand, addr)?;
            store_at_sp_and_decrement(machine, value as u32);
            Ok(ControlFlow::Continue)
        }

        Instruction::Pop { operand } => {
            reject_immediate(&operand, addr)?;
            let address = effective_address(machine, &operand);
            check_data_addr(machine, address, addr)?;
            check_stack(machine, addr)?;
            machine.sp = machine.sp.wrapping_add(1);
            machine.data[address as usize] = read_stack_slot(machine, addr)?;
            Ok(ControlFlow::Continue)
        }
    }
}

/// Immediate forms resolve directly; absolute/indexed forms read through
/// the data segment after a bounds check.
fn resolve_operand(machine: &Machine, operand: Operand, addr: u32) -> Result<i32, VmError> {
    match operand {
        Operand::Immediate(value) => Ok(value),
        Operand::Absolute(_) | Operand::Indexed { .. } => {
            let address = effective_address(machine, &operand);
            check_data_addr(machine, address, addr)?;
            Ok(machine.data[address as usize] as i32)
        }
    }
}

fn reject_immediate(operand: &Operand, addr: u32) -> Result<(), VmError> {
    if operand.is_immediate() {
        Err(VmError::new(ErrorKind::Immediate, addr))
    } else {
        Ok(())
    }
}

fn check_data_addr(machine: &Machine, address: u32, addr: u32) -> Result<(), VmError> {
    if machine.data_in_bounds(address) {
        Ok(())
    } else {
        Err(VmError::new(ErrorKind::SegData, addr))
    }
}

fn check_stack(machine: &Machine, addr: u32) -> Result<(), VmError> {
    if machine.stack_in_bounds() {
        Ok(())
    } else {
        Err(VmError::new(ErrorKind::SegStack, addr))
    }
}

fn read_stack_slot(machine: &Machine, addr: u32) -> Result<u32, VmError> {
    machine
        .data
        .get(machine.sp as usize)
        .copied()
        .ok_or_else(|| VmError::new(ErrorKind::SegStack, addr))
}

/// `data[sp] <- value; sp <- sp - 1`, after checking the *current* `sp` is
/// in range: the invariant is checked before the access, not after.
fn push_word(machine: &mut Machine, value: u32, addr: u32) -> Result<(), VmError> {
    check_stack(machine, addr)?;
    store_at_sp_and_decrement(machine, value);
    Ok(())
}

/// The unchecked half of a push: caller has already confirmed `sp` is in
/// range before resolving whatever value it's about to write.
fn store_at_sp_and_decrement(machine: &mut Machine, value: u32) {
    machine.data[machine.sp as usize] = value;
    machine.sp = machine.sp.wrapping_sub(1);
}

/// The branch/call condition-code predicate table.
fn branch_taken(cond: u8, machine: &Machine, addr: u32) -> Result<bool, VmError> {
    use crate::machine::Cc;

    match cond {
        0 => Ok(true),
        1 => Ok(machine.cc == Cc::Z),
        2 => Ok(machine.cc != Cc::Z),
        3 => Ok(machine.cc == Cc::P),
        4 => Ok(machine.cc == Cc::P || machine.cc == Cc::Z),
        5 => Ok(machine.cc == Cc::N),
        6 => Ok(machine.cc == Cc::N || machine.cc == Cc::Z),
        _ => Err(VmError::new(ErrorKind::Condition, addr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Operand;
    use crate::machine::Cc;

    fn machine_with_stack() -> Machine {
        Machine::load(vec![0; 8], vec![0; 4], 0)
    }

    #[test]
    fn load_immediate_sets_register_and_cc() {
        let mut m = machine_with_stack();
        m.pc = 1;
        let r = decode_execute(
            &mut m,
            Instruction::Load { reg: 1, operand: Operand::Immediate(-7) },
        )
        .unwrap();
        assert_eq!(r, ControlFlow::Continue);
        assert_eq!(m.register(1), -7);
        assert_eq!(m.cc, Cc::N);
    }

    #[test]
    fn add_from_absolute_data_cell() {
        let mut m = machine_with_stack();
        m.data[0] = 5;
        m.set_register(0, 10);
        decode_execute(
            &mut m,
            Instruction::Add { reg: 0, operand: Operand::Absolute(0) },
        )
        .unwrap();
        assert_eq!(m.register(0), 15);
        assert_eq!(m.cc, Cc::P);
    }

    #[test]
    fn store_rejects_immediate_mode() {
        let mut m = machine_with_stack();
        let err = decode_execute(
            &mut m,
            Instruction::Store { reg: 0, operand: Operand::Immediate(1) },
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Immediate);
    }

    #[test]
    fn branch_with_illegal_condition_errors() {
        let mut m = machine_with_stack();
        let err = decode_execute(
            &mut m,
            Instruction::Branch { cond: 9, operand: Operand::Absolute(0) },
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Condition);
    }

    #[test]
    fn data_address_at_datasize_is_out_of_bounds() {
        let mut m = machine_with_stack();
        let datasize = m.datasize();
        let err = decode_execute(
            &mut m,
            Instruction::Load { reg: 0, operand: Operand::Absolute(datasize) },
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SegData);
    }

    #[test]
    fn call_then_ret_restores_pc_and_sp() {
        let mut m = machine_with_stack();
        let sp_before = m.sp;
        m.pc = 3; // the "next instruction" address, as if pre-incremented
        decode_execute(
            &mut m,
            Instruction::Call { cond: 0, operand: Operand::Absolute(6) },
        )
        .unwrap();
        assert_eq!(m.pc, 6);
        assert_eq!(m.sp, sp_before.wrapping_sub(1));

        decode_execute(&mut m, Instruction::Ret).unwrap();
        assert_eq!(m.pc, 3);
        assert_eq!(m.sp, sp_before);
    }

    #[test]
    fn push_with_no_stack_region_overflows_immediately() {
        // dataend == datasize: no stack slots exist, sp sits at datasize.
        let mut m = machine_with_stack();
        m.dataend = m.datasize();
        m.sp = m.dataend;
        let err = decode_execute(&mut m, Instruction::Push { operand: Operand::Immediate(1) })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SegStack);
    }

    #[test]
    fn push_at_last_valid_slot_then_overflows_next_push() {
        let mut m = machine_with_stack();
        m.sp = m.dataend; // last valid stack slot
        decode_execute(&mut m, Instruction::Push { operand: Operand::Immediate(1) }).unwrap();
        let err = decode_execute(&mut m, Instruction::Push { operand: Operand::Immediate(1) })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SegStack);
    }

    #[test]
    fn push_with_bad_operand_and_full_stack_reports_segstack() {
        // check_stack runs before the operand is resolved, so a full stack
        // wins even when the operand address is also out of range.
        let mut m = machine_with_stack();
        m.dataend = m.datasize();
        m.sp = m.dataend;
        let datasize = m.datasize();
        let err = decode_execute(
            &mut m,
            Instruction::Push { operand: Operand::Absolute(datasize) },
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SegStack);
    }

    #[test]
    fn halt_signals_stop() {
        let mut m = machine_with_stack();
        assert_eq!(decode_execute(&mut m, Instruction::Halt).unwrap(), ControlFlow::Halt);
    }

    #[test]
    fn illop_is_fatal() {
        let mut m = machine_with_stack();
        let err = decode_execute(&mut m, Instruction::Illop).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Illegal);
    }

    #[test]
    fn unknown_opcode_is_fatal() {
        let mut m = machine_with_stack();
        let err = decode_execute(&mut m, Instruction::Unknown(42)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
    }
}

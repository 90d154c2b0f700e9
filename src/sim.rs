//! The simulation loop: fetch at PC, pre-increment PC, execute, repeat until
//! HALT. Grounded in `examples/original_source/machine.c`'s `simul`, which
//! traces the instruction, optionally consults the debugger, then calls
//! `decode_execute(pmach, pmach->_text[pmach->_pc++])` — the post-increment
//! there is why PC is already advanced by the time execution starts.

use crate::debugger::disassemble::disassemble;
use crate::debugger::{debug_ask, DebugCommand};
use crate::error::{ErrorKind, VmError};
use crate::exec::{decode_execute, ControlFlow};
use crate::instruction::decode_fields;
use crate::machine::Machine;

/// Runs `machine` to completion. `debug` starts the run in single-step mode;
/// the debugger can drop out of it for the remainder of the run (`c`), but
/// nothing re-enters it once that happens.
pub fn run(machine: &mut Machine, mut debug: bool) -> Result<(), VmError> {
    loop {
        if machine.pc >= machine.textsize() {
            return Err(VmError::new(ErrorKind::SegText, machine.pc));
        }

        let word = machine.text[machine.pc as usize];
        log::trace!("{:#06x}: {}", machine.pc, disassemble(word));

        if debug {
            match debug_ask(machine) {
                DebugCommand::Step => {}
                DebugCommand::Continue => debug = false,
            }
        }

        let instr = decode_fields(word);
        machine.pc = machine.pc.wrapping_add(1);

        match decode_execute(machine, instr)? {
            ControlFlow::Continue => {}
            ControlFlow::Halt => {
                log::warn!("HALT reached at {:#06x}", machine.pc);
                return Ok(());
            }
        }
    }
}

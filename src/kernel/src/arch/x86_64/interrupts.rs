//! Interrupt Descriptor Table (IDT), exception handlers and IRQ dispatch.
//!
//! Every legacy IRQ vector funnels into the shared [`IrqTable`]; drivers
//! register with [`install_handler`] instead of owning IDT entries.

use crate::arch::x86_64::gdt;
use crate::arch::x86_64::pic::{self, Pic, PIC_1_OFFSET};
use crate::arch::x86_64::vga;
use crate::serial_println;
use lazy_static::lazy_static;
use myos_common::{IrqError, IrqHandler, IrqTable, IRQ_LINES};
use spin::Mutex;
use x86_64::structures::idt::{HandlerFunc, InterruptDescriptorTable, InterruptStackFrame};

/// Installed IRQ handlers, one per line.
static IRQ_TABLE: Mutex<IrqTable> = Mutex::new(IrqTable::new());

macro_rules! irq_stubs {
    ($($name:ident => $irq:literal),* $(,)?) => {
        $(
            extern "x86-interrupt" fn $name(_stack_frame: InterruptStackFrame) {
                dispatch($irq);
            }
        )*

        const IRQ_STUBS: [HandlerFunc; IRQ_LINES] = [$($name),*];
    };
}

irq_stubs! {
    irq0 => 0, irq1 => 1, irq2 => 2, irq3 => 3,
    irq4 => 4, irq5 => 5, irq6 => 6, irq7 => 7,
    irq8 => 8, irq9 => 9, irq10 => 10, irq11 => 11,
    irq12 => 12, irq13 => 13, irq14 => 14, irq15 => 15,
}

lazy_static! {
    /// The Interrupt Descriptor Table (IDT).
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();
        idt.breakpoint.set_handler_fn(breakpoint_handler);
        unsafe {
            idt.double_fault.set_handler_fn(double_fault_handler)
                .set_stack_index(gdt::DOUBLE_FAULT_IST_INDEX);
        }
        idt.page_fault.set_handler_fn(page_fault_handler);
        idt.general_protection_fault.set_handler_fn(general_protection_fault_handler);
        idt.divide_error.set_handler_fn(divide_error_handler);

        for (line, stub) in IRQ_STUBS.iter().enumerate() {
            idt[PIC_1_OFFSET as usize + line].set_handler_fn(*stub);
        }

        idt
    };
}

/// Loads the GDT and IDT and remaps the PICs. Interrupts stay disabled.
pub fn init() {
    gdt::init();
    IDT.load();
    pic::init();
}

/// Enables hardware interrupts.
pub fn enable() {
    x86_64::instructions::interrupts::enable();
}

/// Registers `handler` for `irq`.
///
/// Runs with interrupts disabled so a concurrent dispatch cannot observe a
/// half-updated table.
pub fn install_handler(irq: u8, handler: &'static dyn IrqHandler) -> Result<(), IrqError> {
    x86_64::instructions::interrupts::without_interrupts(|| {
        IRQ_TABLE.lock().install(irq, handler)
    })
}

/// Removes the handler registered for `irq`.
pub fn uninstall_handler(irq: u8) -> Result<(), IrqError> {
    x86_64::instructions::interrupts::without_interrupts(|| IRQ_TABLE.lock().uninstall(irq))
}

/// Returns true if a handler is registered for `irq`.
pub fn is_installed(irq: u8) -> bool {
    x86_64::instructions::interrupts::without_interrupts(|| IRQ_TABLE.lock().is_installed(irq))
}

fn dispatch(irq: u8) {
    // Interrupt gates run with IF clear, and the table is only locked
    // elsewhere with interrupts disabled, so this never spins.
    IRQ_TABLE.lock().dispatch(irq, &mut Pic);
}

/// Handler for the breakpoint exception (INT3).
///
/// The shell may hold the screen while it waits for keys, so this never
/// blocks on it.
extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    if !vga::try_print(format_args!("EXCEPTION: BREAKPOINT\n{:#?}\n", stack_frame)) {
        serial_println!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
    }
}

/// Handler for the double fault exception.
extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    _error_code: u64,
) -> ! {
    panic!("EXCEPTION: DOUBLE FAULT\n{:#?}", stack_frame);
}

/// Handler for the page fault exception.
extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: x86_64::structures::idt::PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    panic!(
        "EXCEPTION: PAGE FAULT\nAccessed Address: {:?}\nError Code: {:?}\n{:#?}",
        Cr2::read(),
        error_code,
        stack_frame
    );
}

/// Handler for the general protection fault exception.
extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    panic!(
        "EXCEPTION: GENERAL PROTECTION FAULT\nError Code: {:#x}\n{:#?}",
        error_code, stack_frame
    );
}

/// Handler for the divide error exception.
extern "x86-interrupt" fn divide_error_handler(stack_frame: InterruptStackFrame) {
    panic!("EXCEPTION: DIVIDE ERROR\n{:#?}", stack_frame);
}

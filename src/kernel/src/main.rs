//! MyOS kernel entry point.

#![no_std]
#![no_main]

use bootloader::{entry_point, BootInfo};
use core::panic::PanicInfo;
use myos_kernel::arch::x86_64::vga::{self, Color};
use myos_kernel::arch::x86_64::{self as arch, interrupts, keyboard, timer};
use myos_kernel::boot::{self, banner, Status};
use myos_kernel::terminal::Shell;
use myos_kernel::{allocator, memory, println, serial_println};
use x86_64::VirtAddr;

entry_point!(kernel_main);

/// Called by the bootloader with all physical memory mapped.
fn kernel_main(boot_info: &'static BootInfo) -> ! {
    myos_kernel::init();
    boot::report(Status::Ok, "Serial, GDT, IDT and PICs");

    let phys_mem_offset = VirtAddr::new(boot_info.physical_memory_offset);
    // SAFETY: the bootloader maps physical memory at this offset, and this
    // is the only mapper ever created.
    let mut mapper = unsafe { memory::init_mapper(phys_mem_offset) };
    // SAFETY: the bootloader only marks unused frames as usable.
    let mut frames = unsafe { memory::BootInfoFrameAllocator::init(&boot_info.memory_map) };
    if let Err(err) = boot::step("Kernel heap", allocator::init_heap(&mut mapper, &mut frames)) {
        panic!("heap initialization failed: {:?}", err);
    }

    vga::screen().lock().activate_scrollback();
    boot::report(Status::Ok, "Scrollback");

    if let Err(err) = boot::step("Keyboard", keyboard::init()) {
        panic!("keyboard initialization failed: {}", err);
    }
    if boot::step("Timer", timer::init()).is_err() {
        boot::report(Status::Warn, "Uptime will read zero");
    }

    #[cfg(feature = "test")]
    myos_kernel::tests::run_all();

    interrupts::enable();
    boot::report(Status::Ok, "Interrupts enabled");

    println!();
    banner::print_banner();
    vga::write_color(" Type 'help' for available commands.", Color::Cyan, Color::Black);
    println!();
    println!();

    Shell::new().run()
}

/// Reports the panic on serial and screen, then halts.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    x86_64::instructions::interrupts::disable();
    // SAFETY: interrupts are off and the code that held either lock will
    // never run again.
    unsafe {
        arch::serial::force_unlock();
        vga::force_unlock();
    }

    serial_println!("KERNEL PANIC: {}", info);
    vga::write_color("\n!!! KERNEL PANIC !!!\n", Color::LightRed, Color::Black);
    println!("{}", info);

    arch::halt_loop()
}

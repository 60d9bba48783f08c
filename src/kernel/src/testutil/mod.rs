//! QEMU test harness for the kernel's integration tests.
//!
//! ```rust,ignore
//! #![feature(custom_test_frameworks)]
//! #![test_runner(myos_kernel::testutil::test_runner)]
//! ```

use crate::serial_println;

/// Values written to the isa-debug-exit device.
///
/// QEMU exits with `(value << 1) | 1`, so `Success` becomes 33.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum QemuExitCode {
    /// All tests passed.
    Success = 0x10,
    /// A test failed.
    Failed = 0x11,
}

/// Exits QEMU through the isa-debug-exit device on port 0xf4.
pub fn exit_qemu(exit_code: QemuExitCode) {
    use x86_64::instructions::port::Port;

    // SAFETY: the test runner starts QEMU with isa-debug-exit at 0xf4;
    // the write terminates the VM.
    unsafe {
        let mut port = Port::new(0xf4);
        port.write(exit_code as u32);
    }
}

/// A test case that reports its name on serial.
pub trait Testable {
    /// Runs the test.
    fn run(&self);
}

impl<T: Fn()> Testable for T {
    fn run(&self) {
        serial_println!("test {} ... ", core::any::type_name::<T>());
        self();
        serial_println!("[ok]");
    }
}

/// Runs every test case, then exits QEMU with success.
pub fn test_runner(tests: &[&dyn Testable]) {
    serial_println!("Running {} tests", tests.len());
    for test in tests {
        test.run();
    }
    exit_qemu(QemuExitCode::Success);
}

/// Reports the failing test and exits QEMU with failure.
pub fn test_panic_handler(info: &core::panic::PanicInfo) -> ! {
    serial_println!("[failed]");
    serial_println!("Error: {}", info);
    exit_qemu(QemuExitCode::Failed);
    crate::arch::x86_64::halt_loop()
}

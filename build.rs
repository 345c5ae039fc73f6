use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{env, fs};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

// ========
// Chip description

/// (port, number of pins)
const PORTS: &[(u8, u8)] = &[(0, 16), (1, 16), (2, 8)];

/// EPIC lines, in line order.
const INTERRUPTS: &[&str] = &[
    "TIMER32_0",
    "UART_0",
    "UART_1",
    "SPI_0",
    "SPI_1",
    "GPIO_IRQ",
    "I2C_0",
    "I2C_1",
    "WDT",
    "TIMER16_0",
    "TIMER16_1",
    "TIMER16_2",
    "TIMER32_1",
    "TIMER32_2",
    "SPIFI",
    "RTC",
    "EEPROM",
    "WDT_DOM3",
    "WDT_SPIFI",
    "WDT_EEPROM",
    "DMA",
    "FREQ_MON",
    "PVD_AVCC_UNDER",
    "PVD_AVCC_OVER",
    "PVD_VCC_UNDER",
    "PVD_VCC_OVER",
    "BATTERY_NON_GOOD",
    "BOR",
    "TSENS",
    "ADC",
    "DAC0",
    "DAC1",
];

struct Peripheral {
    name: &'static str,
    /// (bus, gate bit) in the power manager
    clock: Option<(&'static str, u32)>,
    interrupt: Option<&'static str>,
}

const PERIPHERALS: &[Peripheral] = &[
    Peripheral {
        name: "EPIC",
        clock: Some(("ApbM", 1)),
        interrupt: None,
    },
    Peripheral {
        name: "PAD_CONFIG",
        clock: Some(("ApbM", 3)),
        interrupt: None,
    },
    Peripheral {
        name: "GPIO0",
        clock: Some(("ApbP", 12)),
        interrupt: None,
    },
    Peripheral {
        name: "GPIO1",
        clock: Some(("ApbP", 13)),
        interrupt: None,
    },
    Peripheral {
        name: "GPIO2",
        clock: Some(("ApbP", 14)),
        interrupt: None,
    },
    Peripheral {
        name: "GPIO_IRQ",
        clock: Some(("ApbP", 16)),
        interrupt: Some("GPIO_IRQ"),
    },
    Peripheral {
        name: "MTIMER",
        clock: None,
        interrupt: None,
    },
];

const MEMORY: &str = "MEMORY
{
    EEPROM (rx) : ORIGIN = 0x01000000, LENGTH = 8K
    RAM (rwx)   : ORIGIN = 0x02000000, LENGTH = 16K
}

REGION_ALIAS(\"REGION_TEXT\", EEPROM);
REGION_ALIAS(\"REGION_RODATA\", EEPROM);
REGION_ALIAS(\"REGION_DATA\", RAM);
REGION_ALIAS(\"REGION_BSS\", RAM);
REGION_ALIAS(\"REGION_HEAP\", RAM);
REGION_ALIAS(\"REGION_STACK\", RAM);
";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ========
    // Generate singletons

    let mut singletons: Vec<String> = Vec::new();
    for p in PERIPHERALS {
        singletons.push(p.name.to_string());
    }

    // One singleton per IO Pin
    let mut pins_table: Vec<Vec<String>> = Vec::new();
    for &(port, count) in PORTS {
        for pin in 0..count {
            let name = format!("P{}_{}", port, pin);
            // pad index, lower 5 bits are the pin number
            let pad = (port as u16) << 5 | pin as u16;
            pins_table.push(vec![name.clone(), pad.to_string()]);
            singletons.push(name);
        }
    }

    // ========
    // Write singletons

    let mut g = TokenStream::new();

    let singleton_tokens: Vec<_> = singletons.iter().map(|s| format_ident!("{}", s)).collect();

    g.extend(quote! {
        embassy_hal_internal::peripherals_definition!(#(#singleton_tokens),*);
    });

    g.extend(quote! {
        embassy_hal_internal::peripherals_struct!(#(#singleton_tokens),*);
    });

    // ========
    // Generate interrupt declarations

    let irqs: Vec<_> = INTERRUPTS.iter().map(|irq| format_ident!("{}", irq)).collect();

    g.extend(quote! {
        crate::interrupt_mod!(
            #(
                #irqs,
            )*
        );
    });

    // EPIC vector table, dispatched from MachineExternal
    g.extend(quote! {
        #[cfg(all(feature = "rt", target_arch = "riscv32"))]
        extern "C" {
            #(
                fn #irqs();
            )*
        }

        #[cfg(all(feature = "rt", target_arch = "riscv32"))]
        pub(crate) static EPIC_VECTORS: [unsafe extern "C" fn(); crate::pac::EPIC_LINES] = [
            #(
                #irqs,
            )*
        ];
    });

    // ========
    // Generate ClockPeripheral impls

    for p in PERIPHERALS {
        let pname = format_ident!("{}", p.name);
        if let Some((bus, gate)) = p.clock {
            let bus = format_ident!("{}", bus);
            g.extend(quote! {
                impl crate::pm::SealedClockPeripheral for peripherals::#pname {
                    const BUS: crate::pm::Bus = crate::pm::Bus::#bus;
                    const GATE: u32 = #gate;
                }
                impl crate::pm::ClockPeripheral for peripherals::#pname {}
            });
        }
    }

    // ========
    // Write foreach_foo! macrotables

    let mut interrupts_table: Vec<Vec<String>> = Vec::new();
    for p in PERIPHERALS {
        if let Some(irq) = p.interrupt {
            interrupts_table.push(vec![p.name.to_string(), irq.to_string()]);
        }
    }

    let mut m = String::new();

    make_table(&mut m, "foreach_interrupt", &interrupts_table);
    make_table(&mut m, "foreach_pin", &pins_table);

    let out_dir = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    let out_file = out_dir.join("_macros.rs").to_string_lossy().to_string();
    fs::write(&out_file, m).unwrap();
    rustfmt(&out_file);

    // ========
    // Write generated.rs

    let out_file = out_dir.join("_generated.rs").to_string_lossy().to_string();
    fs::write(&out_file, g.to_string()).unwrap();
    rustfmt(&out_file);

    // ========
    // Write memory.x

    if env::var_os("CARGO_FEATURE_MEMORY_X").is_some() {
        let mut memory = String::from(MEMORY);
        memory.push('\n');
        // unbound EPIC lines fall back to the runtime's default handler
        for irq in INTERRUPTS {
            writeln!(memory, "PROVIDE({} = DefaultHandler);", irq).unwrap();
        }
        fs::write(out_dir.join("memory.x"), memory).unwrap();
        println!("cargo:rustc-link-search={}", out_dir.display());
    }
}

fn make_table(out: &mut String, name: &str, data: &Vec<Vec<String>>) {
    write!(
        out,
        "#[allow(unused)]
macro_rules! {} {{
    ($($pat:tt => $code:tt;)*) => {{
        macro_rules! __{}_inner {{
            $(($pat) => $code;)*
            ($_:tt) => {{}}
        }}
",
        name, name
    )
    .unwrap();

    for row in data {
        writeln!(out, "        __{}_inner!(({}));", name, row.join(",")).unwrap();
    }

    write!(
        out,
        "    }};
}}"
    )
    .unwrap();
}

/// rustfmt a given path.
/// Failures are logged to stderr and ignored.
fn rustfmt(path: impl AsRef<Path>) {
    let path = path.as_ref();
    match Command::new("rustfmt").args([path]).output() {
        Err(e) => {
            eprintln!("failed to exec rustfmt {:?}: {:?}", path, e);
        }
        Ok(out) => {
            if !out.status.success() {
                eprintln!("rustfmt {:?} failed:", path);
                eprintln!("=== STDOUT:");
                std::io::stderr().write_all(&out.stdout).unwrap();
                eprintln!("=== STDERR:");
                std::io::stderr().write_all(&out.stderr).unwrap();
            }
        }
    }
}

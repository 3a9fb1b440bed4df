use mpexpr_rs::bigint::tenpow::TenPowers;
use mpexpr_rs::engine::eval_string;
use mpexpr_rs::format::{OutputSink, fixed, format_numbers, to_binary, to_decimal, to_hex, to_octal};
use mpexpr_rs::parse::{parse_integer, parse_rational};

mod test_helpers;
use test_helpers::create_context;

fn printf(fmt: &str, args: &[&str]) -> String {
    let ctx = create_context(17);
    let mut sink = OutputSink::new();
    sink.divert();
    format_numbers(&mut sink, fmt, args, &ctx).unwrap();
    sink.undivert().unwrap()
}

#[test]
fn test_radix_printing() {
    let z = parse_integer("123456789012345678901234567890").unwrap();
    assert_eq!(to_hex(&z), "0x18ee90ff6c373e0ee4e3f0ad2");
    assert_eq!(parse_integer(&to_hex(&z)).unwrap(), z);
    assert_eq!(parse_integer(&to_octal(&z)).unwrap(), z);
    assert_eq!(parse_integer(&to_binary(&z)).unwrap(), z);
    let mut cache = TenPowers::new();
    assert_eq!(to_decimal(&z, &mut cache), "123456789012345678901234567890");
}

#[test]
fn test_fixed_point_printing() {
    let mut cache = TenPowers::new();
    let q = parse_rational("-3.14159").unwrap();
    assert_eq!(fixed(&q, 2, true, &mut cache), "-3.14");
    assert_eq!(fixed(&q, 7, false, &mut cache), "-3.1415900");
    let small = parse_rational("1/64").unwrap();
    assert_eq!(fixed(&small, 6, false, &mut cache), ".015625");
}

#[test]
fn test_printf_conversions() {
    assert_eq!(printf("%d items", &["42.9"]), "42 items");
    assert_eq!(printf("%.3f", &["0.6666666"]), "0.667");
    assert_eq!(printf("%f", &["1.5"]), "1.50000000");
    assert_eq!(printf("%e", &["0.000123"]), "1.23000000e-4");
    assert_eq!(printf("%r", &["0.125"]), "1/8");
    assert_eq!(printf("%R", &["2"]), "2/1");
    assert_eq!(printf("%x", &["0.5"]), "1/2");
    assert_eq!(printf("%b|%o", &["6", "64"]), "0b110|0100");
    assert_eq!(printf("%s=%d", &["answer", "42"]), "answer=42");
}

#[test]
fn test_printf_width_and_precision_arguments() {
    assert_eq!(printf("[%8.2f]", &["3.14159"]), "[    3.14]");
    assert_eq!(printf("[%-8.2f]", &["3.14159"]), "[3.14    ]");
    assert_eq!(printf("[%*.*f]", &["7", "1", "2.25"]), "[    2.2]");
    assert_eq!(printf("%c%c", &["x", "yz"]), "xy");
    assert_eq!(printf("tab\\there", &[]), "tab\there");
}

#[test]
fn test_sink_collects_nested_output() {
    let ctx = create_context(4);
    let mut sink = OutputSink::new();
    sink.divert();
    sink.write_str("outer:");
    sink.divert();
    format_numbers(&mut sink, "%d", &["7"], &ctx).unwrap();
    let inner = sink.undivert().unwrap();
    sink.write_str(&inner);
    sink.write_char(':');
    sink.write_str(&eval_string("1 / 8.0", &ctx).unwrap());
    assert_eq!(sink.undivert().as_deref(), Some("outer:7:.125"));
    assert_eq!(sink.depth(), 0);
}

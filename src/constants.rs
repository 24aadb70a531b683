use rust_decimal::Decimal;

/// Money is fixed-point with two fractional digits.
pub const MONEY_SCALE: u32 = 2;

/// One minor unit (0.01) at [`MONEY_SCALE`].
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

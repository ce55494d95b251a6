// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Converte um valor anulável no seu zero aditivo.
///
/// Todo campo monetário ou de quantidade do ledger pode vir `NULL`; este é o
/// único ponto onde `NULL` vira `0` nos cálculos do dashboard.
pub trait OrZero {
    type Output;

    fn or_zero(self) -> Self::Output;
}

impl OrZero for Option<Decimal> {
    type Output = Decimal;

    fn or_zero(self) -> Decimal {
        self.unwrap_or(Decimal::ZERO)
    }
}

impl OrZero for Option<i64> {
    type Output = i64;

    fn or_zero(self) -> i64 {
        self.unwrap_or(0)
    }
}

impl OrZero for Option<i32> {
    type Output = i64;

    fn or_zero(self) -> i64 {
        self.map(i64::from).unwrap_or(0)
    }
}

/// Variação percentual entre dois períodos, com uma casa decimal.
///
/// - `previous > 0`: `(current - previous) / previous * 100`
/// - `previous == 0`: `100` se `current > 0`, senão `0`
///
/// Arredondamento: meio para longe do zero (0.05 -> 0.1, -0.05 -> -0.1).
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        // Multiplica antes de dividir para não perder precisão nos pontos médios.
        ((current - previous) * Decimal::ONE_HUNDRED / previous)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    } else if current > Decimal::ZERO {
        Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

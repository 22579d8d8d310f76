// src/common/money.rs

use rust_decimal::Decimal;

use crate::common::error::AppError;

/// Maior valor que cabe nas colunas `NUMERIC(14, 2)`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

fn too_large() -> AppError {
    AppError::bad_request("Amount is too large")
}

/// Quantidade × preço, sem valores negativos e sem estourar o `Decimal`.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, AppError> {
    if quantity.is_sign_negative() || unit_price.is_sign_negative() {
        return Err(AppError::bad_request("Quantity and unit price must not be negative"));
    }
    quantity.checked_mul(unit_price).ok_or_else(too_large)
}

/// Soma de valores monetários, limitada ao que a coluna aceita.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AppError> {
    let mut total = Decimal::ZERO;
    for value in values {
        total = total.checked_add(value).ok_or_else(too_large)?;
    }
    ensure_storable(total)
}

pub fn ensure_storable(amount: Decimal) -> Result<Decimal, AppError> {
    if amount > MAX_AMOUNT {
        Err(too_large())
    } else {
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal")
    }

    #[test]
    fn max_amount_is_the_column_limit() {
        assert_eq!(MAX_AMOUNT, dec("999999999999.99"));
        assert!(ensure_storable(dec("999999999999.99")).is_ok());
        assert!(ensure_storable(dec("1000000000000.00")).is_err());
    }

    #[test]
    fn overflowing_products_are_bad_requests() {
        let err = line_total(dec("79228162514264337593543950335"), dec("2")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(line_total(dec("2.5"), dec("4")).unwrap(), dec("10"));
    }

    #[test]
    fn sums_stop_at_the_column_limit() {
        assert_eq!(checked_sum([dec("1.10"), dec("2.20")]).unwrap(), dec("3.30"));
        assert!(checked_sum([MAX_AMOUNT, dec("0.01")]).is_err());
        assert_eq!(checked_sum([]).unwrap(), Decimal::ZERO);
    }
}

// src/services/payroll_calculator.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::payroll::Deductions;

pub const DEFAULT_PAY_PERIODS: u32 = 52;

const ANNUAL_BASIC_EXEMPTION: Decimal = Decimal::from_parts(3500, 0, 0, false, 0);
const PENSION_RATE: Decimal = Decimal::from_parts(595, 0, 0, false, 4); // 5,95%
const INSURANCE_RATE: Decimal = Decimal::from_parts(166, 0, 0, false, 4); // 1,66%
const WORK_COMP_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 3); // 2,5%

/// Faixas anuais (limite superior, alíquota). `None` = sem teto.
const BRACKETS: [(Option<Decimal>, Decimal); 5] = [
    (Some(Decimal::from_parts(55_867, 0, 0, false, 0)), Decimal::from_parts(15, 0, 0, false, 2)),
    (Some(Decimal::from_parts(111_733, 0, 0, false, 0)), Decimal::from_parts(205, 0, 0, false, 3)),
    (Some(Decimal::from_parts(173_205, 0, 0, false, 0)), Decimal::from_parts(26, 0, 0, false, 2)),
    (Some(Decimal::from_parts(246_752, 0, 0, false, 0)), Decimal::from_parts(29, 0, 0, false, 2)),
    (None, Decimal::from_parts(33, 0, 0, false, 2)),
];

/// Valores reportados com 2 casas, truncando em direção a zero.
///
/// Não é arredondamento comercial: para bruto 1000 a contribuição de
/// 55,4951... sai como 55.49, enquanto o meio-para-cima daria 55.50.
/// Os valores de referência da folha seguem o truncamento.
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Imposto anual progressivo: cada faixa tributa só a parcela dentro dela.
pub fn annual_income_tax(annual_gross: Decimal) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for (limit, rate) in BRACKETS {
        if annual_gross <= lower {
            break;
        }
        let upper = limit.map_or(annual_gross, |limit| limit.min(annual_gross));
        tax += (upper - lower) * rate;
        match limit {
            Some(limit) => lower = limit,
            None => break,
        }
    }
    tax
}

/// Descontos de um período de pagamento. Função pura, sem caminho de erro.
pub fn calculate(gross_pay: Decimal, pay_periods_per_year: u32) -> Deductions {
    let periods = Decimal::from(pay_periods_per_year.max(1));
    let exemption_per_period = ANNUAL_BASIC_EXEMPTION / periods;

    let pension = ((gross_pay - exemption_per_period) * PENSION_RATE).max(Decimal::ZERO);
    let insurance = gross_pay * INSURANCE_RATE;
    let levy = gross_pay * WORK_COMP_RATE;
    let income_tax = annual_income_tax(gross_pay * periods) / periods;

    // O encargo (levy) é do empregador e não sai do líquido
    let net_pay = gross_pay - pension - insurance - income_tax;

    Deductions {
        gross_pay: to_cents(gross_pay),
        pension_contribution: to_cents(pension),
        insurance_premium: to_cents(insurance),
        work_comp_levy: to_cents(levy),
        income_tax: to_cents(income_tax),
        net_pay: to_cents(net_pay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal")
    }

    #[test]
    fn weekly_gross_of_1000() {
        let d = calculate(dec("1000"), DEFAULT_PAY_PERIODS);

        assert_eq!(d.gross_pay, dec("1000.00"));
        assert_eq!(d.pension_contribution, dec("55.49"));
        assert_eq!(d.insurance_premium, dec("16.60"));
        assert_eq!(d.work_comp_levy, dec("25.00"));
        // 52 000/ano, tudo na primeira faixa: 7 800 / 52
        assert_eq!(d.income_tax, dec("150.00"));
        assert_eq!(d.net_pay, dec("777.90"));
    }

    #[test]
    fn cents_truncate_instead_of_rounding_half_up() {
        assert_eq!(to_cents(dec("55.4951")), dec("55.49"));
        assert_eq!(to_cents(dec("55.4951")), dec("55.4951").round_dp(2) - dec("0.01"));
        assert_eq!(to_cents(dec("16.6")), dec("16.60"));
    }

    #[test]
    fn exemption_per_period() {
        let exemption = ANNUAL_BASIC_EXEMPTION / Decimal::from(DEFAULT_PAY_PERIODS);
        assert_eq!(exemption.round_dp(2), dec("67.31"));
    }

    #[test]
    fn pension_never_negative() {
        let d = calculate(dec("40"), DEFAULT_PAY_PERIODS);
        assert_eq!(d.pension_contribution, Decimal::ZERO);

        let zero = calculate(Decimal::ZERO, DEFAULT_PAY_PERIODS);
        assert_eq!(zero.net_pay, Decimal::ZERO);
        assert_eq!(zero.income_tax, Decimal::ZERO);
    }

    #[test]
    fn marginal_accumulation_across_brackets() {
        // 55 867 × 15% + (104 000 − 55 867) × 20,5%
        assert_eq!(annual_income_tax(dec("104000")), dec("18247.315"));
        assert_eq!(annual_income_tax(dec("55867")), dec("8380.05"));

        let top = annual_income_tax(dec("300000"));
        let expected = dec("55867") * dec("0.15")
            + (dec("111733") - dec("55867")) * dec("0.205")
            + (dec("173205") - dec("111733")) * dec("0.26")
            + (dec("246752") - dec("173205")) * dec("0.29")
            + (dec("300000") - dec("246752")) * dec("0.33");
        assert_eq!(top, expected);
    }

    #[test]
    fn levy_is_not_deducted_from_net() {
        let d = calculate(dec("2000"), DEFAULT_PAY_PERIODS);
        let without_levy = dec("2000") - d.pension_contribution - d.insurance_premium - d.income_tax;
        assert!((without_levy - d.net_pay).abs() <= dec("0.02"));
        assert!(d.net_pay > without_levy - d.work_comp_levy);
    }

    #[test]
    fn idempotent() {
        let gross = dec("1834.56");
        assert_eq!(calculate(gross, 26), calculate(gross, 26));
    }

    #[test]
    fn tax_is_monotonic_in_gross() {
        let mut previous = Decimal::ZERO;
        for step in 0..400 {
            let gross = Decimal::from(step * 25);
            let tax = calculate(gross, DEFAULT_PAY_PERIODS).income_tax;
            assert!(tax >= previous, "tax dropped at gross {gross}");
            previous = tax;
        }
    }

    #[test]
    fn outputs_have_two_decimals() {
        let d = calculate(dec("1234.5678"), DEFAULT_PAY_PERIODS);
        for value in [d.gross_pay, d.pension_contribution, d.insurance_premium, d.work_comp_levy, d.income_tax, d.net_pay] {
            assert!(value.scale() <= 2, "{value}");
        }
    }
}

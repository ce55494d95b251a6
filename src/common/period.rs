// src/common/period.rs

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Intervalo semiaberto `[start, end)` usado em todos os filtros do ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[cfg(test)]
impl DateRange {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }
}

/// Um mês de calendário. Internamente guarda sempre o dia 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// `None` para mês fora de 1..=12 ou ano fora do suportado pelo chrono.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Mês que contém o instante.
    pub fn of(at: NaiveDateTime) -> Self {
        let date = at.date();
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Avança (ou recua, se negativo) `months` meses.
    pub fn shift(&self, months: i32) -> Option<Self> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(Self)
    }

    pub fn previous(&self) -> Option<Self> {
        self.shift(-1)
    }

    /// O período `[início do mês, início do mês seguinte)`.
    pub fn period(&self) -> Option<DateRange> {
        let next = self.shift(1)?;
        Some(DateRange {
            start: self.start(),
            end: next.start(),
        })
    }

    /// "MM/yyyy"
    pub fn label(&self) -> String {
        format!("{:02}/{:04}", self.month(), self.year())
    }

    /// Rótulo de exibição, ex: "March 2024" / "Março 2024".
    pub fn display_label(&self, lang: &str) -> String {
        format!("{} {}", month_names(lang)[self.month0()], self.year())
    }

    /// Rótulo curto do eixo do gráfico, ex: "Mar" / "Fev".
    pub fn short_label(&self, lang: &str) -> String {
        month_names(lang)[self.month0()].chars().take(3).collect()
    }

    fn month0(&self) -> usize {
        self.0.month0() as usize
    }
}

fn month_names(lang: &str) -> &'static [&'static str; 12] {
    match lang {
        "pt" => &MONTHS_PT,
        _ => &MONTHS_EN,
    }
}

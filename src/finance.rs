use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Income => "收入",
            EntryKind::Expense => "支出",
        }
    }
}

impl Serialize for EntryKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    #[serde(rename = "日期")]
    pub date: &'static str,
    #[serde(rename = "描述")]
    pub description: &'static str,
    #[serde(rename = "金额")]
    pub amount: i64,
    #[serde(rename = "类型")]
    pub kind: EntryKind,
}

const fn entry(date: &'static str, description: &'static str, amount: i64, kind: EntryKind) -> LedgerEntry {
    LedgerEntry {
        date,
        description,
        amount,
        kind,
    }
}

pub const LEDGER: [LedgerEntry; 9] = [
    entry("2024-06-01", "工资", 6000, EntryKind::Income),
    entry("2024-06-02", "早餐", 15, EntryKind::Expense),
    entry("2024-06-05", "交通费", 80, EntryKind::Expense),
    entry("2024-06-10", "购物", 1200, EntryKind::Expense),
    entry("2024-06-15", "水电费", 200, EntryKind::Expense),
    entry("2024-06-20", "兼职收入", 1500, EntryKind::Income),
    entry("2024-06-22", "午餐", 25, EntryKind::Expense),
    entry("2024-06-25", "话费", 50, EntryKind::Expense),
    entry("2024-06-28", "理财收益", 300, EntryKind::Income),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceReport {
    pub all_records: Vec<LedgerEntry>,
    pub expense_records: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
}

pub fn summarize(entries: &[LedgerEntry]) -> LedgerSummary {
    let total = |kind: EntryKind| {
        entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.amount)
            .sum::<i64>()
    };
    let income = total(EntryKind::Income);
    let expense = total(EntryKind::Expense);
    LedgerSummary {
        income,
        expense,
        balance: income - expense,
    }
}

pub fn build_report() -> FinanceReport {
    FinanceReport {
        all_records: LEDGER.to_vec(),
        expense_records: LEDGER
            .iter()
            .filter(|entry| entry.kind == EntryKind::Expense)
            .cloned()
            .collect(),
        summary: summarize(&LEDGER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_balances_income_against_expense() {
        let report = build_report();
        assert_eq!(
            report.summary,
            LedgerSummary {
                income: 7800,
                expense: 1570,
                balance: 6230,
            }
        );
        assert_eq!(report.expense_records.len(), 6);
    }

    #[test]
    fn entries_serialize_with_ledger_headings() {
        let json = serde_json::to_string(&LEDGER[0]).expect("serialize");
        assert_eq!(
            json,
            r#"{"日期":"2024-06-01","描述":"工资","金额":6000,"类型":"收入"}"#
        );
    }
}

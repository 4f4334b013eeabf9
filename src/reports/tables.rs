use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tauforge::analysis::{GroupTotals, SampleResult};
use tauforge::histogram::WeightedHistogram;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, from: usize, to: usize) {
    for i in from..=to {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn cutflow(results: &[SampleResult]) {
    let mut table = new_table();

    let mut header = vec![
        Cell::new("Sample").add_attribute(Attribute::Bold),
        Cell::new("Kind"),
    ];
    if let Some(first) = results.first() {
        for (label, _) in first.cutflow.stages() {
            header.push(Cell::new(label));
        }
    }
    header.push(Cell::new("Weight").fg(Color::Cyan));
    header.push(Cell::new("Yield").add_attribute(Attribute::Bold));
    table.add_row(header);

    for r in results {
        let mut row = vec![
            Cell::new(&r.sample.name).add_attribute(Attribute::Bold),
            Cell::new(r.sample.kind.to_string()),
        ];
        for (_, count) in r.cutflow.stages() {
            row.push(Cell::new(count));
        }
        row.push(Cell::new(format!("{:.4}", r.weight)).fg(Color::Cyan));
        row.push(Cell::new(format!("{:.2}", r.histogram.integral())).add_attribute(Attribute::Bold));
        table.add_row(row);
    }

    align_right(&mut table, 2, 10);
    println!("\n{}", table);
}

fn value_cell(h: Option<&WeightedHistogram>, bin: usize) -> Cell {
    match h {
        Some(h) => Cell::new(format!("{:.2} ± {:.2}", h.sumw[bin], h.bin_error(bin))),
        None => Cell::new("-"),
    }
}

pub fn comparison(totals: &GroupTotals) {
    let observed = totals.observed.as_ref();
    let simulated = totals.simulated.as_ref();
    let reference = match observed.or(simulated) {
        Some(h) => h,
        None => {
            println!("No histograms to compare.");
            return;
        }
    };

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Mass bin / GeV").add_attribute(Attribute::Bold),
        Cell::new("Data").fg(Color::Green),
        Cell::new("Simulation").fg(Color::Cyan),
        Cell::new("Data/Sim"),
    ]);

    for bin in 0..reference.n_bins {
        let lo = reference.bin_low_edge(bin);
        let hi = reference.bin_low_edge(bin + 1);
        let ratio = match (observed, simulated) {
            (Some(o), Some(s)) if s.sumw[bin] > 0.0 => format!("{:.2}", o.sumw[bin] / s.sumw[bin]),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(format!("[{:.0}, {:.0})", lo, hi)),
            value_cell(observed, bin),
            value_cell(simulated, bin),
            Cell::new(ratio),
        ]);
    }

    let total = |h: Option<&WeightedHistogram>| {
        h.map(|h| format!("{:.2}", h.integral()))
            .unwrap_or_else(|| "-".to_string())
    };
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(total(observed)).add_attribute(Attribute::Bold),
        Cell::new(total(simulated)).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    align_right(&mut table, 1, 3);
    println!("\n{}", table);
}

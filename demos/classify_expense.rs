use autonomo::core::*;
use autonomo::rules::*;

fn main() {
    let rules = RuleTable::spain_2025();
    let profile = UserProfile::new(WorkLocation::Home, 30);

    let expenses = [
        ("Factura electricidad marzo", "Iberdrola"),
        ("Gasolina desplazamiento cliente", "Repsol"),
        ("Licencia anual software", "JetBrains"),
        ("Consulta dentista", "Clínica Dental Sonrisa"),
        ("Ropa", "Zara"),
        ("Compra varia", "Bazar"),
    ];

    println!("Rule table version: {}", rules.version().unwrap_or("unversioned"));
    println!(
        "Profile: works from {}, {}% home office\n",
        profile.work_location.code(),
        profile.home_office_pct
    );

    for (description, supplier) in expenses {
        let vat = classify_vat(description, supplier, &rules);
        let ded = classify_deductibility(description, vat.rate, vat.exempt, &profile, &rules);
        let flag = if vat.needs_review() { " (review)" } else { "" };
        println!("{description} [{supplier}]");
        println!("  IVA {} {}{flag}", vat.rate, vat.article);
        println!("  {}", ded.justification);
    }
}

//! Roster result page fixtures for tests.

pub(crate) fn data_row(name: &str, license: &str, address: &str) -> String {
    format!(
        "<tr><td><font>{name}</font></td>\
         <td><font>{license}</font><br><font>Certified Residential</font><br><font>06/30/2027</font></td>\
         <td><font>{address}</font></td></tr>"
    )
}

/// A full result page: summary table, data table, spacer, pager.
pub(crate) fn page(rows: &[String], summary: &str, has_next: bool) -> String {
    let next = if has_next { "<td><a href=\"#\">Next</a></td>" } else { "" };
    format!(
        "<html><body>\
         <table><tr><td><span>Results</span><span>{summary}</span></td></tr></table>\
         <table><tr><td>Name</td><td>License</td><td>Address</td></tr>{}</table>\
         <table><tr><td>&nbsp;</td></tr></table>\
         <table><tr><td>Page</td>{next}</tr></table>\
         </body></html>",
        rows.concat()
    )
}

pub(crate) fn sample_rows() -> Vec<String> {
    vec![
        data_row("PAUL M LEWIS MR", " AK1234 ", "ACME CORP<br>123 MAIN ST<br>ANCHORAGE,&nbsp;AK&nbsp;995011234"),
        data_row("SUJAN MASTER", "TX555", "9 ELM RD<br>AUSTIN&nbsp;TX&nbsp;78701"),
    ]
}

//! Report shell and renderer embedding.
//!
//! Builds the final HTML document around the aggregated edge list: metadata
//! header, structural sections, a plain transition table, and the flow
//! diagram itself, drawn in the browser by d3-sankey loaded from a CDN. The
//! only contract with the renderer is the three-column rows embedded as a
//! JSON array.

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::DiagramStyle;
use crate::flow::Edge;

/// Everything the page template needs, already resolved by the caller.
pub struct ReportContext<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub date: NaiveDate,
    pub intro: Option<&'a str>,
    /// Where the data came from, shown in the collection notes.
    pub source_name: &'a str,
    /// Roster size the run attempted.
    pub entities: usize,
    pub records: usize,
    pub skipped: usize,
    pub edges: &'a [Edge],
    pub style: &'a DiagramStyle,
    pub run_id: &'a str,
    pub generated_at: DateTime<Utc>,
}

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
<style>
  body { font-family: Georgia, 'Times New Roman', serif; color: #222; margin: 0; }
  main { max-width: 54rem; margin: 0 auto; padding: 2rem 1rem 4rem; }
  header h1 { font-size: 2rem; margin-bottom: 0.25rem; }
  .meta { color: #666; font-size: 0.9rem; }
  h2 { margin-top: 2.5rem; border-bottom: 1px solid #ddd; padding-bottom: 0.25rem; }
  svg { width: 100%; height: auto; font: 11px sans-serif; }
  table { border-collapse: collapse; margin-top: 1rem; }
  th, td { border: 1px solid #ccc; padding: 0.3rem 0.7rem; text-align: left; }
  th { background: #f5f5f5; }
  td:last-child { text-align: right; }
  footer { margin-top: 3rem; color: #999; font-size: 0.8rem; border-top: 1px solid #eee; padding-top: 0.5rem; }
</style>
</head>
<body>
<main>
<header>
  <h1>{{title}}</h1>
  <p class="meta">{{meta}}</p>
</header>
{{intro_section}}
<section>
  <h2>Data collection</h2>
  <p>Collected {{records}} rows across {{entities}} entities from <code>{{source}}</code>.{{skipped_note}}</p>
</section>
<section>
  <h2>Score flow</h2>
  <p class="meta">Ribbon width is the number of entities making each transition.</p>
  <svg id="diagram" viewBox="0 0 {{width}} {{height}}"></svg>
</section>
<section>
  <h2>Transition table</h2>
  <table>
    <thead><tr><th>From</th><th>To</th><th>Weight</th></tr></thead>
    <tbody>
{{table_rows}}    </tbody>
  </table>
</section>
<footer>Run {{run_id}} · generated {{generated_at}}</footer>
</main>
<script src="https://cdn.jsdelivr.net/npm/d3@7"></script>
<script src="https://cdn.jsdelivr.net/npm/d3-sankey@0.12.3/dist/d3-sankey.min.js"></script>
<script>
const rows = {{edge_rows}};
if (rows.length > 0) {
  const names = Array.from(new Set(rows.flatMap(r => [r[0], r[1]])));
  const index = new Map(names.map((name, i) => [name, i]));
  const graph = d3.sankey()
    .nodeWidth({{node_width}})
    .nodePadding({{node_padding}})
    .extent([[1, 1], [{{width}} - 1, {{height}} - 6]])({
      nodes: names.map(name => ({ name })),
      links: rows.map(r => ({ source: index.get(r[0]), target: index.get(r[1]), value: r[2] })),
    });
  const svg = d3.select("#diagram");
  svg.append("g")
    .selectAll("rect")
    .data(graph.nodes)
    .join("rect")
    .attr("x", d => d.x0)
    .attr("y", d => d.y0)
    .attr("height", d => d.y1 - d.y0)
    .attr("width", d => d.x1 - d.x0)
    .attr("fill", "#4682b4");
  svg.append("g")
    .attr("fill", "none")
    .selectAll("path")
    .data(graph.links)
    .join("path")
    .attr("d", d3.sankeyLinkHorizontal())
    .attr("stroke", "#9ecae1")
    .attr("stroke-opacity", 0.55)
    .attr("stroke-width", d => Math.max(1, d.width));
  svg.append("g")
    .selectAll("text")
    .data(graph.nodes)
    .join("text")
    .attr("x", d => d.x0 < {{width}} / 2 ? d.x1 + 6 : d.x0 - 6)
    .attr("y", d => (d.y0 + d.y1) / 2)
    .attr("dy", "0.35em")
    .attr("text-anchor", d => d.x0 < {{width}} / 2 ? "start" : "end")
    .text(d => d.name);
}
</script>
</body>
</html>
"##;

/// Escape text destined for HTML body or attribute positions.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The edge list in the renderer's three-column shape, as a JSON array.
fn edge_rows(edges: &[Edge]) -> String {
    let rows: Vec<(&str, &str, u32)> = edges
        .iter()
        .map(|e| (e.from_label.as_str(), e.to_label.as_str(), e.weight))
        .collect();
    // "</script>" inside a label must not end the script block.
    serde_json::to_string(&rows)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", r"<\/")
}

/// Render the full HTML document.
pub fn render_html(ctx: &ReportContext) -> String {
    let meta = if ctx.author.is_empty() {
        ctx.date.format("%Y-%m-%d").to_string()
    } else {
        format!("{} · {}", escape_html(ctx.author), ctx.date.format("%Y-%m-%d"))
    };

    let intro = match ctx.intro {
        Some(text) if !text.is_empty() => format!(
            "<section>\n  <h2>Introduction</h2>\n  <p>{}</p>\n</section>",
            escape_html(text)
        ),
        _ => String::new(),
    };

    let skipped_note = if ctx.skipped == 0 {
        String::new()
    } else {
        format!(
            " Skipped {}/{} entities after failed detail requests.",
            ctx.skipped, ctx.entities
        )
    };

    let mut table_rows = String::new();
    for edge in ctx.edges {
        table_rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&edge.from_label),
            escape_html(&edge.to_label),
            edge.weight
        ));
    }

    PAGE.replace("{{title}}", &escape_html(ctx.title))
        .replace("{{meta}}", &meta)
        .replace("{{intro_section}}", &intro)
        .replace("{{records}}", &ctx.records.to_string())
        .replace("{{entities}}", &ctx.entities.to_string())
        .replace("{{source}}", &escape_html(ctx.source_name))
        .replace("{{skipped_note}}", &skipped_note)
        .replace("{{node_width}}", &ctx.style.node_width.to_string())
        .replace("{{node_padding}}", &ctx.style.node_padding.to_string())
        .replace("{{width}}", &ctx.style.width.to_string())
        .replace("{{height}}", &ctx.style.height.to_string())
        .replace("{{edge_rows}}", &edge_rows(ctx.edges))
        .replace("{{table_rows}}", &table_rows)
        .replace("{{run_id}}", &escape_html(ctx.run_id))
        .replace(
            "{{generated_at}}",
            &ctx.generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        )
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn push_field(out: &mut String, field: &str, sep: char) {
    if needs_quotes(field, sep) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Render the edge list as a separated-values table with a header row.
///
/// Three columns: source label, target label, weight. Fields containing the
/// separator, quotes or newlines are quoted with doubled inner quotes.
pub fn edges_table(edges: &[Edge], sep: char) -> String {
    let mut out = String::new();
    out.push_str("from");
    out.push(sep);
    out.push_str("to");
    out.push(sep);
    out.push_str("weight\n");
    for edge in edges {
        push_field(&mut out, &edge.from_label, sep);
        out.push(sep);
        push_field(&mut out, &edge.to_label, sep);
        out.push(sep);
        out.push_str(&edge.weight.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str, weight: u32) -> Edge {
        Edge {
            from_label: from.to_string(),
            to_label: to.to_string(),
            weight,
        }
    }

    fn context<'a>(edges: &'a [Edge], style: &'a DiagramStyle) -> ReportContext<'a> {
        ReportContext {
            title: "Season score flow",
            author: "Ana",
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            intro: Some("How round scores moved across the season."),
            source_name: "https://example.test/api",
            entities: 3,
            records: 12,
            skipped: 0,
            edges,
            style,
            run_id: "7f9c0c1e",
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn render_embeds_rows_and_metadata() {
        let edges = vec![edge("Round 1: 5", "Round 2: 3", 2)];
        let style = DiagramStyle::default();
        let html = render_html(&context(&edges, &style));

        assert!(html.contains("<title>Season score flow</title>"));
        assert!(html.contains("Ana · 2026-08-01"));
        assert!(html.contains("How round scores moved across the season."));
        assert!(html.contains(r#"[["Round 1: 5","Round 2: 3",2]]"#));
        assert!(html.contains("<td>Round 1: 5</td><td>Round 2: 3</td><td>2</td>"));
        assert!(html.contains("Collected 12 rows across 3 entities"));
        assert!(html.contains("7f9c0c1e"));
        // Every placeholder must have been substituted.
        assert!(!html.contains("{{"));
    }

    #[test]
    fn render_applies_diagram_style() {
        let edges = vec![edge("Round 1: 0", "Round 2: 0", 1)];
        let style = DiagramStyle {
            width: 800,
            height: 400,
            node_width: 20,
            node_padding: 10,
        };
        let html = render_html(&context(&edges, &style));

        assert!(html.contains(r#"viewBox="0 0 800 400""#));
        assert!(html.contains(".nodeWidth(20)"));
        assert!(html.contains(".nodePadding(10)"));
    }

    #[test]
    fn render_escapes_markup_in_labels_and_title() {
        let edges = vec![edge("Round 1: <b>", "Round 2: &", 1)];
        let style = DiagramStyle::default();
        let mut ctx = context(&edges, &style);
        ctx.title = "<script>alert(1)</script>";
        let html = render_html(&ctx);

        assert!(html.contains("<title>&lt;script&gt;alert(1)&lt;/script&gt;</title>"));
        assert!(html.contains("<td>Round 1: &lt;b&gt;</td>"));
        assert!(html.contains("<td>Round 2: &amp;</td>"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn render_without_intro_omits_the_section() {
        let edges = vec![edge("Round 1: 1", "Round 2: 1", 1)];
        let style = DiagramStyle::default();
        let mut ctx = context(&edges, &style);
        ctx.intro = None;
        let html = render_html(&ctx);

        assert!(!html.contains("Introduction"));
    }

    #[test]
    fn render_notes_skipped_entities() {
        let edges = vec![edge("Round 1: 1", "Round 2: 1", 1)];
        let style = DiagramStyle::default();
        let mut ctx = context(&edges, &style);
        ctx.skipped = 2;
        ctx.entities = 30;
        let html = render_html(&ctx);

        assert!(html.contains("Skipped 2/30 entities"));
    }

    #[test]
    fn render_keeps_script_blocks_intact() {
        let edges = vec![edge("</script><b>x", "Round 2: 1", 1)];
        let style = DiagramStyle::default();
        let html = render_html(&context(&edges, &style));

        assert!(html.contains(r#"<\/script><b>x"#));
    }

    #[test]
    fn edges_table_renders_header_and_rows() {
        let edges = vec![
            edge("Round 1: 0", "Round 2: 0", 1),
            edge("Round 1: 5", "Round 2: 3", 2),
        ];
        let table = edges_table(&edges, ',');

        assert_eq!(
            table,
            "from,to,weight\nRound 1: 0,Round 2: 0,1\nRound 1: 5,Round 2: 3,2\n"
        );
    }

    #[test]
    fn edges_table_supports_tabs() {
        let edges = vec![edge("Round 1: 5", "Round 2: 3", 2)];
        let table = edges_table(&edges, '\t');

        assert_eq!(table, "from\tto\tweight\nRound 1: 5\tRound 2: 3\t2\n");
    }

    #[test]
    fn edges_table_quotes_fields_containing_the_separator() {
        let edges = vec![edge("Round 1, extra", "say \"hi\"", 1)];
        let table = edges_table(&edges, ',');

        assert_eq!(
            table,
            "from,to,weight\n\"Round 1, extra\",\"say \"\"hi\"\"\",1\n"
        );
    }

    #[test]
    fn render_is_deterministic() {
        let edges = vec![edge("Round 1: 5", "Round 2: 3", 2)];
        let style = DiagramStyle::default();
        let ctx = context(&edges, &style);

        assert_eq!(render_html(&ctx), render_html(&ctx));
    }
}

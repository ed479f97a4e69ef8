use super::*;

const INDEX_HTML: &str = r#"
<html><body><nav>
<ul>
  <li class="toctree-l1">
    <a class="reference internal" href="cluster.html">cluster</a>
    <ul>
      <li class="toctree-l2"><a class="reference internal" href="generated/KMeans.html">KMeans</a></li>
      <li class="toctree-l2"><a class="reference internal" href="generated/DBSCAN.html">DBSCAN</a></li>
    </ul>
  </li>
  <li class="toctree-l1">
    <a class="reference internal" href="linear_model.html">linear_model</a>
    <ul>
      <li class="toctree-l2"><a class="reference internal" href="generated/LinearRegression.html">LinearRegression</a></li>
    </ul>
  </li>
</ul>
</nav></body></html>
"#;

const CLASS_PAGE_HTML: &str = r#"
<html><body>
<dl>
<dt class="sig sig-object py">
  <em class="property">class</em>
  <span class="sig-prename descclassname">sklearn.cluster.</span>
  <span class="sig-name descname">KMeans</span>
  <em class="sig-param">n_clusters=8</em>
  <em class="sig-param">init='k-means++'</em>
</dt>
</dl>
<div class="doctest highlight-default notranslate">
<pre>&gt;&gt;&gt; from sklearn.cluster import KMeans
&gt;&gt;&gt; km = KMeans(n_clusters=2)
&gt;&gt;&gt; km.fit(X)
... extra_line()
KMeans(n_clusters=2)</pre>
</div>
</body></html>
"#;

fn base_url() -> Url {
    Url::parse("https://scikit-learn.org/stable/api/index.html").expect("base URL should parse")
}

#[test]
fn index_sections_preserve_document_order() {
    let reference =
        parse_reference_index(INDEX_HTML, &base_url()).expect("should parse index page");

    let sections: Vec<&String> = reference.sections.keys().collect();
    assert_eq!(sections, ["cluster", "linear_model"]);

    let cluster = &reference.sections["cluster"];
    let subsections: Vec<&String> = cluster.subsections.keys().collect();
    assert_eq!(subsections, ["KMeans", "DBSCAN"]);
}

#[test]
fn index_links_are_resolved_against_base() {
    let reference =
        parse_reference_index(INDEX_HTML, &base_url()).expect("should parse index page");

    let cluster = &reference.sections["cluster"];
    assert_eq!(cluster.link, "https://scikit-learn.org/stable/api/cluster.html");
    assert_eq!(
        cluster.subsections["KMeans"].link,
        "https://scikit-learn.org/stable/api/generated/KMeans.html"
    );
}

#[test]
fn index_entries_start_with_empty_details() {
    let reference =
        parse_reference_index(INDEX_HTML, &base_url()).expect("should parse index page");

    let kmeans = &reference.sections["cluster"].subsections["KMeans"];
    assert_eq!(kmeans.class_signature, "");
    assert_eq!(kmeans.example_code, "");
}

#[test]
fn page_without_sidebar_is_a_scrape_error() {
    let err = parse_reference_index("<html><body><p>nothing here</p></body></html>", &base_url())
        .expect_err("page without sidebar should fail");
    assert!(matches!(err, ApidexError::Scrape(_)));
}

#[test]
fn class_signature_is_reassembled_from_spans() {
    let signature = extract_class_signature(CLASS_PAGE_HTML);
    assert_eq!(
        signature,
        "class sklearn.cluster.KMeans(n_clusters=8, init='k-means++')"
    );
}

#[test]
fn missing_signature_block_yields_fallback() {
    let signature = extract_class_signature("<html><body><p>no class here</p></body></html>");
    assert_eq!(signature, SIGNATURE_FALLBACK);
}

#[test]
fn example_code_strips_interpreter_prompts() {
    let example = extract_example_code(CLASS_PAGE_HTML);
    assert_eq!(
        example,
        "from sklearn.cluster import KMeans\nkm = KMeans(n_clusters=2)\nkm.fit(X)\nextra_line()\nKMeans(n_clusters=2)"
    );
}

#[test]
fn missing_example_block_yields_fallback() {
    let example = extract_example_code("<html><body><pre>bare pre block</pre></body></html>");
    assert_eq!(example, EXAMPLE_FALLBACK);
}

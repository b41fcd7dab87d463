//! End-to-end pipeline tests over an on-disk content tree

use std::fs;
use std::path::Path;

use penna::store::DocumentStore;
use penna::Site;

fn write_post(base: &Path, folder: &str, frontmatter: &str, body: &str) {
    let dir = base.join("content").join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.md"), format!("---\n{}---\n\n{}", frontmatter, body)).unwrap();
}

#[test]
fn cross_post_backlinks() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "post-a",
        "title: Post A\nslug: post-a\ndate: 2024-02-01\n",
        "Read [Post B](/blog/post-b) for more.\n",
    );
    write_post(
        tmp.path(),
        "post-b",
        "title: Post B\nslug: post-b\ndate: 2024-01-01\n",
        "No links here.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();
    assert_eq!(store.len(), 2);

    let a = store.get("post-a").unwrap();
    let b = store.get("post-b").unwrap();

    assert_eq!(a.outgoing_links.len(), 1);
    assert_eq!(a.outgoing_links[0].slug, "post-b");
    assert_eq!(a.outgoing_links[0].title, "Post B");
    assert!(a.incoming_links.is_empty());

    assert_eq!(b.incoming_links.len(), 1);
    assert_eq!(b.incoming_links[0].slug, "post-a");
    assert_eq!(b.incoming_links[0].title, "Post A");
    assert!(b.outgoing_links.is_empty());
}

#[test]
fn comma_string_tags_are_normalized() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "tagged",
        "title: Tagged\ndate: 2024-01-01\ntags: \"typescript, ngrx\"\n",
        "Body.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();
    let doc = store.get("tagged").unwrap();
    assert_eq!(doc.tags, vec!["TypeScript", "NgRx"]);
}

#[test]
fn collection_sorted_by_date_then_slug() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "older",
        "title: Older\nslug: older\ndate: 2023-06-01\n",
        "Body.\n",
    );
    write_post(
        tmp.path(),
        "newer",
        "title: Newer\nslug: newer\ndate: 2024-06-01\n",
        "Body.\n",
    );
    write_post(
        tmp.path(),
        "same-day-b",
        "title: Same Day B\nslug: same-day-b\ndate: 2024-06-01\n",
        "Body.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();

    let slugs: Vec<&str> = store.documents().iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "same-day-b", "older"]);
}

#[test]
fn tldr_sibling_is_optional() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "with-tldr",
        "title: With Tldr\nslug: with-tldr\ndate: 2024-01-02\n",
        "Long form.\n",
    );
    fs::write(
        tmp.path().join("content/with-tldr/tldr.md"),
        "The short version.\n",
    )
    .unwrap();
    write_post(
        tmp.path(),
        "without-tldr",
        "title: Without Tldr\nslug: without-tldr\ndate: 2024-01-01\n",
        "Long form only.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();

    let with = store.get("with-tldr").unwrap();
    assert!(with.tldr.as_deref().unwrap().contains("The short version."));

    let without = store.get("without-tldr").unwrap();
    assert!(without.tldr.is_none());
}

#[test]
fn duplicate_slugs_fail_the_build() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "first",
        "title: First\nslug: the-slug\ndate: 2024-01-01\n",
        "Body.\n",
    );
    write_post(
        tmp.path(),
        "second",
        "title: Second\nslug: the-slug\ndate: 2024-01-02\n",
        "Body.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let err = DocumentStore::load(&site).unwrap_err();
    assert!(err.to_string().contains("duplicate slug"));
}

#[test]
fn missing_frontmatter_fails_the_build() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("content/broken");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.md"), "# No header here\n\nJust a body.\n").unwrap();

    let site = Site::new(tmp.path()).unwrap();
    assert!(DocumentStore::load(&site).is_err());
}

#[test]
fn code_info_string_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "code-post",
        "title: Code Post\nslug: code-post\ndate: 2024-01-01\n",
        "```cs{2}:Program.cs\nvar a = 1;\nvar b = 2;\nvar c = 3;\n```\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();
    let html = &store.get("code-post").unwrap().html;

    assert!(html.contains(r#"class="highlight csharp""#));
    assert!(html.contains(r#"<span class="code-filename">Program.cs</span>"#));
    assert!(html.contains(r#"class="line highlighted""#));
    assert!(html.contains(r#"class="line dim""#));
}

#[test]
fn heading_anchor_override_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "headings",
        "title: Headings\nslug: headings\ndate: 2024-01-01\n",
        "## Some Title {custom-anchor}\n\n## Plain Heading\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    let store = DocumentStore::load(&site).unwrap();
    let html = &store.get("headings").unwrap().html;

    assert!(html.contains(r#"id="custom-anchor""#));
    assert!(!html.contains(r#"id="some-title""#));
    assert!(html.contains(r#"id="plain-heading""#));
}

#[test]
fn build_writes_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    write_post(
        tmp.path(),
        "only-post",
        "title: Only Post\nslug: only-post\ndate: 2024-01-01\ndescription: The one post\n",
        "Hello world.\n",
    );

    let site = Site::new(tmp.path()).unwrap();
    site.build().unwrap();

    let public = tmp.path().join("public");
    assert!(public.join("blog/only-post/index.html").exists());
    assert!(public.join("documents.json").exists());

    let rss = fs::read_to_string(public.join("rss.xml")).unwrap();
    assert!(rss.contains("<title>Only Post</title>"));

    let sitemap = fs::read_to_string(public.join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("http://example.com/blog/only-post"));

    site.clean().unwrap();
    assert!(!public.exists());
}

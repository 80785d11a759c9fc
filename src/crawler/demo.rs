//! Offline page fetcher serving canned pages
//!
//! Used by `gleaner --demo` to exercise the whole pipeline without network access.
//! The page served for a URL is chosen deterministically from the URL.

use crate::crawler::fetcher::PageFetcher;
use crate::FetchError;
use async_trait::async_trait;

const PRODUCT_PAGE: &str = r#"<html>
<head>
    <title>Sample Product Page - Electronics Store</title>
    <meta name="description" content="High-quality electronics at great prices">
</head>
<body>
    <h1>Premium Wireless Headphones</h1>
    <p>Experience crystal-clear audio with our premium wireless headphones.
       Features include noise cancellation, 30-hour battery life, and premium comfort.</p>
    <p>Price: $299.99</p>
    <p>Contact: sales@electronics-store.com</p>
    <p>Phone: (555) 123-4567</p>
    <h2>Product Features</h2>
    <p>Advanced noise cancellation technology eliminates background noise for immersive listening.</p>
    <a href="/products/speakers">View Speakers</a>
    <a href="/products/earbuds">View Earbuds</a>
    <img src="/images/headphones.jpg" alt="Headphones">
</body>
</html>"#;

const NEWS_PAGE: &str = r#"<html>
<head>
    <title>Tech News - Latest Updates</title>
    <meta name="description" content="Stay updated with the latest technology news">
</head>
<body>
    <h1>Breaking: New AI Breakthrough Announced</h1>
    <p>Published on Jan 15, 2024</p>
    <p>Researchers have announced a major breakthrough in artificial intelligence
       that could revolutionize how we interact with technology.</p>
    <h2>Key Highlights</h2>
    <p>The new system demonstrates unprecedented capabilities in natural language understanding.</p>
    <p>For inquiries: press@technews.com</p>
    <a href="/news/archive">News Archive</a>
    <a href="/news/subscribe">Subscribe</a>
</body>
</html>"#;

const COURSE_PAGE: &str = r#"<html>
<head>
    <title>Online Course Platform</title>
    <meta name="description" content="Learn new skills with expert instructors">
</head>
<body>
    <h1>Python Programming Masterclass</h1>
    <p>Complete Python course from beginner to advanced. Learn at your own pace with
       hands-on projects and real-world applications.</p>
    <p>Course Price: $89.99</p>
    <p>Duration: 40 hours</p>
    <p>Start Date: Feb 1, 2024</p>
    <h2>Course Content</h2>
    <p>Module 1: Python Basics</p>
    <p>Module 2: Object-Oriented Programming</p>
    <p>Module 3: Web Development with Python</p>
    <p>Instructor email: instructor@courses.com</p>
    <a href="/courses/java">Java Programming</a>
    <a href="/courses/javascript">JavaScript Essentials</a>
</body>
</html>"#;

/// Seed URLs used by demo mode
pub const DEMO_SEEDS: &[&str] = &[
    "https://demo-store.com/electronics",
    "https://demo-news.com/technology",
    "https://demo-blog.com/tutorials",
];

/// Serves one of three canned pages for every URL
#[derive(Debug, Clone, Default)]
pub struct DemoFetcher;

impl DemoFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Returns the page served for `url`
    pub fn page_for(url: &str) -> &'static str {
        const PAGES: [&str; 3] = [PRODUCT_PAGE, NEWS_PAGE, COURSE_PAGE];

        let lowered = url.to_ascii_lowercase();
        if lowered.contains("store") || lowered.contains("product") {
            return PRODUCT_PAGE;
        }
        if lowered.contains("news") {
            return NEWS_PAGE;
        }
        if lowered.contains("course") || lowered.contains("tutorial") {
            return COURSE_PAGE;
        }

        let index = url.bytes().map(usize::from).sum::<usize>() % PAGES.len();
        PAGES[index]
    }
}

#[async_trait]
impl PageFetcher for DemoFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Serving demo page for {}", url);
        Ok(Self::page_for(url).to_string())
    }
}

use crate::feedback::FeedbackSize;

const CONCISE_REVIEW: &str = r#"Brief code review. Do not repeat these instructions in your answer.
Rate the code from 1 to 10 on each of these criteria:
- Descriptive naming
- Sparing, useful comments
- No needless repetition (DRY)
- Consistent coding style
- Appropriate error and exception handling
- Performance
- Modularity
- Avoidance of global state
- Documentation
Sum the ratings and scale the result to a final score between 0 and 100.
Then provide:
Quality Score: [0-100] - mandatory line, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
- Strengths: 3 short key points
- Issues found: 3 short main concerns
Be specific and quote examples from the code.
Length: between 200 and 500 characters."#;

const DETAILED_REVIEW: &str = r#"Detailed code review. Do not repeat these instructions in your answer.
Rate the code from 1 to 10 on each of these criteria:
- Descriptive naming
- Sparing, useful comments
- No needless repetition (DRY)
- Consistent coding style
- Appropriate error and exception handling
- Performance
- Modularity
- Avoidance of global state
- Documentation
Sum the ratings and scale the result to a final score between 0 and 100.
Then provide:
Quality Score: [0-100] - mandatory line, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
Key Strengths: 4-5 key points
Areas for Improvement: 4-5 main concerns
Code Structure Analysis: possible structural improvements
Be specific and quote examples from the code.
Length: between 1000 and 2000 characters."#;

const COMPREHENSIVE_REVIEW: &str = r#"Comprehensive code review. Do not repeat these instructions in your answer.
Rate the code from 1 to 10 on each of these criteria:
- Descriptive naming
- Sparing, useful comments
- No needless repetition (DRY)
- Consistent coding style
- Appropriate error and exception handling
- Performance
- Modularity
- Avoidance of global state
- Documentation
Sum the ratings and scale the result to a final score between 0 and 100.
Then provide:
Quality Score: [0-100] - mandatory line, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
Detailed Strengths Analysis:
- Code Organization
- Implementation Quality
- Best Practices Usage
- Documentation
Areas Requiring Attention:
- Code Quality Issues
- Potential Bugs
- Performance Concerns
- Maintenance Challenges
Security Assessment:
- Vulnerability Analysis
- Security Best Practices
Recommendations and Suggestions:
- High Priority Changes
- Long-term Improvements
- Refactoring Suggestions
Be specific and quote examples from the code.
Length: between 5000 and 10000 characters."#;

const CONCISE_COMMIT: &str = r#"Quick commit review:
Commit: {message}
Author: {author}
Date: {date}

Changes:
{changes}

Work out the quality score first:
score = 100
if additions + deletions > 500: score -= 20
else if additions + deletions > 100: score -= 10
if complexity > 15: score -= 15
if the commit includes tests: score += 10
clamp score to 0..100

Then provide:
Quality Score (0-100) - mandatory line based on your calculation, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
- Key Changes Summary
- Main Impact Points
- Possible Issues
Be specific and quote examples from the commit.
Length: between 200 and 500 characters."#;

const DETAILED_COMMIT: &str = r#"Detailed commit analysis:
Commit: {message}
Author: {author}
Date: {date}

Changes:
{changes}

Work out the quality score first:
score = 100
if additions + deletions > 500: score -= 20
else if additions + deletions > 100: score -= 10
if complexity > 15: score -= 15
if the commit includes tests: score += 10
clamp score to 0..100

Then provide:
Quality Score (0-100) - mandatory line, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
- Summary of Changes
- Impact Analysis
- Best Practices Review
- Suggestions
Be specific and quote examples from the commit.
Length: between 1000 and 2000 characters."#;

const COMPREHENSIVE_COMMIT: &str = r#"In-depth commit analysis:
Commit: {message}
Author: {author}
Date: {date}

Changes:
{changes}

Work out the quality score first:
score = 100
if additions + deletions > 500: score -= 20
else if additions + deletions > 100: score -= 10
if complexity > 15: score -= 15
if the commit includes tests: score += 10
clamp score to 0..100

Then provide a comprehensive analysis:
Quality Score (0-100) - mandatory line, formatted exactly like "Quality Score: 70"
A few reasons for this exact score.
- Commit Overview
- Technical Analysis
- Best Practices
- Impact Analysis
- Security Review
- Recommendations and Suggestions
Be specific and quote examples from the commit.
Length: between 5000 and 10000 characters."#;

/// Review instructions for a single file.
pub fn review_template(size: FeedbackSize) -> &'static str {
    match size {
        FeedbackSize::Concise => CONCISE_REVIEW,
        FeedbackSize::Detailed => DETAILED_REVIEW,
        FeedbackSize::Comprehensive => COMPREHENSIVE_REVIEW,
    }
}

/// Commit review template with `{message}`, `{author}`, `{date}` and `{changes}` slots.
pub fn commit_template(size: FeedbackSize) -> &'static str {
    match size {
        FeedbackSize::Concise => CONCISE_COMMIT,
        FeedbackSize::Detailed => DETAILED_COMMIT,
        FeedbackSize::Comprehensive => COMPREHENSIVE_COMMIT,
    }
}

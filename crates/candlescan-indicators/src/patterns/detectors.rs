//! Shape rules for each candlestick pattern.
//!
//! Every detector looks at the candle at `i` (and the ones before it) and
//! returns the TA-Lib style code when the shape matches. `None` covers both
//! "no match" and "not enough history yet".

use candlescan_core::types::Bar;

use super::context::CandleContext;
use super::PatternSettings;

pub(crate) type Detector = fn(&CandleContext<'_>, usize, &PatternSettings) -> Option<i32>;

const BULLISH: i32 = 100;
const BEARISH: i32 = -100;

#[inline]
fn is_white(bar: &Bar) -> bool {
    bar.close >= bar.open
}

#[inline]
fn color_code(bar: &Bar) -> i32 {
    if is_white(bar) {
        BULLISH
    } else {
        BEARISH
    }
}

fn previous(i: usize, back: usize) -> Option<usize> {
    i.checked_sub(back)
}

/// Small body, long lower shadow, no upper shadow.
fn hammer_shape(ctx: &CandleContext<'_>, i: usize) -> Option<bool> {
    let bar = ctx.bar(i);
    Some(
        ctx.body_short(i)?
            && bar.lower_shadow() > bar.body()
            && ctx.very_short(bar.upper_shadow(), i)?,
    )
}

/// Small body, long upper shadow, no lower shadow.
fn inverted_shape(ctx: &CandleContext<'_>, i: usize) -> Option<bool> {
    let bar = ctx.bar(i);
    Some(
        ctx.body_short(i)?
            && bar.upper_shadow() > bar.body()
            && ctx.very_short(bar.lower_shadow(), i)?,
    )
}

pub(crate) fn hammer(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let near = ctx.near(p)?;
    let at_low = ctx.bar(i).body_bottom() <= ctx.bar(p).low + near;
    (hammer_shape(ctx, i)? && at_low).then_some(BULLISH)
}

pub(crate) fn hanging_man(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let near = ctx.near(p)?;
    let at_high = ctx.bar(i).body_bottom() >= ctx.bar(p).high - near;
    (hammer_shape(ctx, i)? && at_high).then_some(BEARISH)
}

pub(crate) fn inverted_hammer(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let gap_down = ctx.bar(i).body_top() < ctx.bar(p).body_bottom();
    (inverted_shape(ctx, i)? && gap_down).then_some(BULLISH)
}

pub(crate) fn shooting_star(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let gap_up = ctx.bar(i).body_bottom() > ctx.bar(p).body_top();
    (inverted_shape(ctx, i)? && gap_up).then_some(BEARISH)
}

pub(crate) fn doji(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    ctx.is_doji(i)?.then_some(BULLISH)
}

pub(crate) fn dragonfly_doji(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let bar = ctx.bar(i);
    let matched = ctx.is_doji(i)?
        && ctx.very_short(bar.upper_shadow(), i)?
        && !ctx.very_short(bar.lower_shadow(), i)?;
    matched.then_some(BULLISH)
}

pub(crate) fn gravestone_doji(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let bar = ctx.bar(i);
    let matched = ctx.is_doji(i)?
        && ctx.very_short(bar.lower_shadow(), i)?
        && !ctx.very_short(bar.upper_shadow(), i)?;
    matched.then_some(BULLISH)
}

pub(crate) fn spinning_top(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let bar = ctx.bar(i);
    let matched =
        ctx.body_short(i)? && bar.upper_shadow() > bar.body() && bar.lower_shadow() > bar.body();
    matched.then(|| color_code(bar))
}

pub(crate) fn marubozu(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let bar = ctx.bar(i);
    let matched = ctx.body_long(i)?
        && ctx.very_short(bar.upper_shadow(), i)?
        && ctx.very_short(bar.lower_shadow(), i)?;
    matched.then(|| color_code(bar))
}

pub(crate) fn engulfing(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let (prev, cur) = (ctx.bar(p), ctx.bar(i));

    if is_white(cur) && !is_white(prev) {
        let covers = cur.close >= prev.open && cur.open <= prev.close;
        let strict = cur.close > prev.open || cur.open < prev.close;
        return (covers && strict).then_some(BULLISH);
    }
    if !is_white(cur) && is_white(prev) {
        let covers = cur.open >= prev.close && cur.close <= prev.open;
        let strict = cur.open > prev.close || cur.close < prev.open;
        return (covers && strict).then_some(BEARISH);
    }
    None
}

pub(crate) fn harami(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let (prev, cur) = (ctx.bar(p), ctx.bar(i));
    let inside = cur.body_top() < prev.body_top() && cur.body_bottom() > prev.body_bottom();

    let matched = ctx.body_long(p)? && ctx.body_short(i)? && inside;
    matched.then(|| -color_code(prev))
}

pub(crate) fn piercing(ctx: &CandleContext<'_>, i: usize, s: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let (prev, cur) = (ctx.bar(p), ctx.bar(i));

    let matched = !is_white(prev)
        && ctx.body_long(p)?
        && is_white(cur)
        && ctx.body_long(i)?
        && cur.open < prev.low
        && cur.close > prev.close + prev.body() * s.cover_penetration
        && cur.close < prev.open;
    matched.then_some(BULLISH)
}

pub(crate) fn dark_cloud_cover(ctx: &CandleContext<'_>, i: usize, s: &PatternSettings) -> Option<i32> {
    let p = previous(i, 1)?;
    let (prev, cur) = (ctx.bar(p), ctx.bar(i));

    let matched = is_white(prev)
        && ctx.body_long(p)?
        && !is_white(cur)
        && cur.open > prev.high
        && cur.close > prev.open
        && cur.close < prev.close - prev.body() * s.cover_penetration;
    matched.then_some(BEARISH)
}

pub(crate) fn morning_star(ctx: &CandleContext<'_>, i: usize, s: &PatternSettings) -> Option<i32> {
    let (a, b) = (previous(i, 2)?, previous(i, 1)?);
    let (first, star, last) = (ctx.bar(a), ctx.bar(b), ctx.bar(i));

    let matched = !is_white(first)
        && ctx.body_long(a)?
        && ctx.body_short(b)?
        && star.body_top() < first.body_bottom()
        && is_white(last)
        && last.body() > ctx.avg_body(i)?
        && last.close > first.close + first.body() * s.star_penetration;
    matched.then_some(BULLISH)
}

pub(crate) fn evening_star(ctx: &CandleContext<'_>, i: usize, s: &PatternSettings) -> Option<i32> {
    let (a, b) = (previous(i, 2)?, previous(i, 1)?);
    let (first, star, last) = (ctx.bar(a), ctx.bar(b), ctx.bar(i));

    let matched = is_white(first)
        && ctx.body_long(a)?
        && ctx.body_short(b)?
        && star.body_bottom() > first.body_top()
        && !is_white(last)
        && last.body() > ctx.avg_body(i)?
        && last.close < first.close - first.body() * s.star_penetration;
    matched.then_some(BEARISH)
}

pub(crate) fn three_white_soldiers(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let start = previous(i, 2)?;
    for k in start..=i {
        let bar = ctx.bar(k);
        if !is_white(bar) || !ctx.very_short(bar.high - bar.close, k)? {
            return None;
        }
    }
    for k in start + 1..=i {
        let (prev, cur) = (ctx.bar(k - 1), ctx.bar(k));
        let opens_in_body = cur.open > prev.open && cur.open <= prev.close + ctx.near(k - 1)?;
        if cur.close <= prev.close || !opens_in_body {
            return None;
        }
    }
    Some(BULLISH)
}

pub(crate) fn three_black_crows(ctx: &CandleContext<'_>, i: usize, _: &PatternSettings) -> Option<i32> {
    let start = previous(i, 2)?;
    for k in start..=i {
        let bar = ctx.bar(k);
        if is_white(bar) || !ctx.very_short(bar.close - bar.low, k)? {
            return None;
        }
    }
    for k in start + 1..=i {
        let (prev, cur) = (ctx.bar(k - 1), ctx.bar(k));
        let opens_in_body = cur.open < prev.open && cur.open > prev.close;
        if cur.close >= prev.close || !opens_in_body {
            return None;
        }
    }
    Some(BEARISH)
}

//! ページ内で評価するJavaScript

use crate::traits::AriaRole;

/// ロール検索で見つけた要素に付与する属性
pub(crate) const TARGET_ATTR: &str = "data-postal-lookup-target";
pub(crate) const TARGET_SELECTOR: &str = "[data-postal-lookup-target]";

const FIND_BY_ROLE: &str = r#"
(function(role, name, attr) {
    document.querySelectorAll('[' + attr + ']').forEach(function(e) { e.removeAttribute(attr); });
    var selectors = {
        textbox: 'input:not([type]), input[type="text"], input[type="search"], textarea, [role="textbox"]',
        button: 'button, input[type="submit"], input[type="button"], [role="button"]'
    };
    var textOf = function(id) {
        var el = document.getElementById(id);
        return el ? el.textContent : '';
    };
    var accessibleName = function(el) {
        var aria = el.getAttribute('aria-label');
        if (aria) return aria;
        var labelledBy = el.getAttribute('aria-labelledby');
        if (labelledBy) return labelledBy.split(/\s+/).map(textOf).join(' ');
        if (el.labels && el.labels.length) {
            return Array.prototype.map.call(el.labels, function(l) { return l.textContent; }).join(' ');
        }
        if (el.tagName === 'INPUT' && (el.type === 'submit' || el.type === 'button')) return el.value || '';
        if (el.tagName === 'BUTTON' || el.getAttribute('role') === 'button') return el.textContent || '';
        return el.getAttribute('title') || el.getAttribute('placeholder') || '';
    };
    var norm = function(s) { return (s || '').replace(/\s+/g, ' ').trim(); };
    var wanted = norm(name);
    var candidates = document.querySelectorAll(selectors[role] || '');
    for (var i = 0; i < candidates.length; i++) {
        if (norm(accessibleName(candidates[i])).indexOf(wanted) >= 0) {
            candidates[i].setAttribute(attr, '1');
            return true;
        }
    }
    return false;
})"#;

const SET_VALUE: &str = r#"
(function(selector, value) {
    var el = document.querySelector(selector);
    if (!el) return false;
    el.focus();
    el.value = value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
})"#;

const SELECT_OPTION: &str = r#"
(function(selector, value) {
    var el = document.querySelector(selector);
    if (!el) return 'missing';
    var numeric = value !== '' && !isNaN(value);
    var options = el.options || [];
    for (var i = 0; i < options.length; i++) {
        var opt = options[i];
        var hit = opt.value === value
            || opt.label.trim() === value
            || (numeric && opt.value !== '' && !isNaN(opt.value) && Number(opt.value) === Number(value));
        if (hit) {
            el.value = opt.value;
            el.dispatchEvent(new Event('input', { bubbles: true }));
            el.dispatchEvent(new Event('change', { bubbles: true }));
            return 'ok';
        }
    }
    return 'no-option';
})"#;

const TEXT_CONTENT: &str = r#"
(function(selector) {
    var el = document.querySelector(selector);
    return el ? el.textContent : null;
})"#;

fn js_string(value: &str) -> String {
    // &str のシリアライズは失敗しない
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

pub(crate) fn find_by_role(role: AriaRole, name: &str) -> String {
    format!(
        "{}({}, {}, {})",
        FIND_BY_ROLE,
        js_string(role.as_str()),
        js_string(name),
        js_string(TARGET_ATTR)
    )
}

pub(crate) fn set_value(selector: &str, value: &str) -> String {
    format!("{}({}, {})", SET_VALUE, js_string(selector), js_string(value))
}

pub(crate) fn select_option(selector: &str, value: &str) -> String {
    format!("{}({}, {})", SELECT_OPTION, js_string(selector), js_string(value))
}

pub(crate) fn text_content(selector: &str) -> String {
    format!("{}({})", TEXT_CONTENT, js_string(selector))
}

pub(crate) fn exists(selector: &str) -> String {
    format!("document.querySelector({}) !== null", js_string(selector))
}

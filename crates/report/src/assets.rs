//! Fixed style and script assets embedded in every report. Template text
//! only; no logic lives here.

pub const CSS: &str = r#"
.collapsible {
  cursor: pointer;
  margin-bottom: 0;
}
.collapsible:before {
  content: "▼ ";
  color: #888;
}
.collapsible.collapsed:before {
  content: "► ";
}
.collapsible.collapsed + article {
  display: none;
}

h2 {
  background: #da4;
  color: white;
  padding: 4px;
  margin: 12px -8px 0 -8px;
}

a.headerlink:link,
a.headerlink:visited {
  visibility: hidden;
  color: #eee;
  text-decoration: none;
}

h2:hover > a.headerlink {
  visibility: visible;
}

a.result {
  padding: 2px;
  text-decoration: none;
}
a.success {
  border: 1px solid #2F8F0F;
  background: #8FDF5F;
  color: white;
}
a.failure {
  border: 1px solid #8F0F0F;
  background: #E98080;
  color: white;
}
pre {
  border: 1px solid #eee;
  background: #f8f8f8;
  border-radius: 4px;
  padding: 6px;
  white-space: pre-wrap;
  margin-top: 6px;
  margin-left: 1em;
}
pre .collapsible {
  background: #f0f0f0;
  color: green;
  border-top: 1px solid #eee;
  border-bottom: none;
  margin: 0 -6px 0 -6px;
  padding: 4px;
  display: block;
}
pre .collapsible.collapsed {
  border-bottom: 1px solid #eee;
}
pre article {
  border-bottom: 1px solid #eee;
  border-top: none;
  background: #f0f0f0;
  margin: 0 -6px 0 -6px;
  padding: 0 6px;
}
span.error {
  color: red;
}
span.header {
  color: #888;
}
span.stderr {
  color: red;
}
article .steps {
  margin-left: 1em;
}
p.source {
  color: #888;
  margin-left: 1em;
}
"#;

pub const JQUERY_URL: &str = "https://code.jquery.com/jquery-1.9.1.min.js";

pub const JAVASCRIPT: &str = r##"
$(function(){
    $('.collapsible').click(function(e) {
        if (e.target.tagName != "A") {
            $(this).toggleClass('collapsed');
        }
    });
    $('#footer').append(' ');
    $('#footer').append($('<a href="#">Expand all</a>').click(function(e){
        e.preventDefault();
        $('h2.collapsible').removeClass('collapsed');
    }))
    $('#footer').append(' ');
    $('#footer').append($('<a href="#">Collapse all</a>').click(function(e){
        e.preventDefault();
        $('h2.collapsible').addClass('collapsed');
    }))
});
"##;
